//! Paginated league-filter menu.
//!
//! The callback payload is the only place the `action:page[:id]` string
//! encoding exists; everything else works with the typed [`MenuAction`].

use std::collections::BTreeSet;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::models::League;

/// Leagues shown per menu page
pub const PAGE_SIZE: usize = 8;

/// A decoded league-menu callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Flip one league's membership and re-render the same page
    Toggle { page: usize, league_id: u32 },
    /// Re-render with another page
    Navigate { page: usize },
}

impl MenuAction {
    pub fn encode(&self) -> String {
        match self {
            MenuAction::Toggle { page, league_id } => format!("toggle:{}:{}", page, league_id),
            MenuAction::Navigate { page } => format!("nav:{}", page),
        }
    }

    pub fn decode(data: &str) -> Option<Self> {
        let mut parts = data.split(':');

        match parts.next()? {
            "toggle" => {
                let page = parts.next()?.parse().ok()?;
                let league_id = parts.next()?.parse().ok()?;
                Some(MenuAction::Toggle { page, league_id })
            }
            "nav" => {
                let page = parts.next()?.parse().ok()?;
                Some(MenuAction::Navigate { page })
            }
            _ => None,
        }
    }
}

/// Render one page of the league catalog as an inline keyboard: one
/// button per league with a checkmark prefix for selected entries, plus
/// a navigation row offering only the neighbor pages that exist.
pub fn league_keyboard(
    catalog: &[League],
    selected: &BTreeSet<u32>,
    page: usize,
) -> InlineKeyboardMarkup {
    let start = page * PAGE_SIZE;
    let entries = catalog.iter().skip(start).take(PAGE_SIZE);

    let mut rows: Vec<Vec<InlineKeyboardButton>> = entries
        .map(|league| {
            let prefix = if selected.contains(&league.id) {
                "✅ "
            } else {
                ""
            };
            vec![InlineKeyboardButton::callback(
                format!("{}{}", prefix, league.label()),
                MenuAction::Toggle {
                    page,
                    league_id: league.id,
                }
                .encode(),
            )]
        })
        .collect();

    let mut nav = Vec::new();
    if page > 0 {
        nav.push(InlineKeyboardButton::callback(
            "⬅️ Anterior",
            MenuAction::Navigate { page: page - 1 }.encode(),
        ));
    }
    if (page + 1) * PAGE_SIZE < catalog.len() {
        nav.push(InlineKeyboardButton::callback(
            "Próxima ➡️",
            MenuAction::Navigate { page: page + 1 }.encode(),
        ));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn catalog(n: usize) -> Vec<League> {
        (0..n)
            .map(|i| League {
                id: i as u32 + 1,
                name: format!("League {}", i + 1),
                country: None,
            })
            .collect()
    }

    fn button_texts(kb: &InlineKeyboardMarkup) -> Vec<String> {
        kb.inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.text.clone())
            .collect()
    }

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for action in [
            MenuAction::Toggle { page: 2, league_id: 39 },
            MenuAction::Navigate { page: 0 },
        ] {
            assert_eq!(MenuAction::decode(&action.encode()), Some(action));
        }

        assert_eq!(MenuAction::decode("toggle:2:39"), Some(MenuAction::Toggle { page: 2, league_id: 39 }));
        assert_eq!(MenuAction::decode("garbage"), None);
        assert_eq!(MenuAction::decode("toggle:x:y"), None);
        assert_eq!(MenuAction::decode(""), None);
    }

    #[test]
    fn test_first_page_has_next_only() {
        let kb = league_keyboard(&catalog(20), &BTreeSet::new(), 0);
        let texts = button_texts(&kb);

        assert_eq!(texts.len(), PAGE_SIZE + 1);
        assert!(texts.contains(&"Próxima ➡️".to_string()));
        assert!(!texts.iter().any(|t| t.contains("Anterior")));
    }

    #[test]
    fn test_last_page_has_previous_only() {
        // 20 leagues -> pages 0..=2, last page holds 4 entries
        let kb = league_keyboard(&catalog(20), &BTreeSet::new(), 2);
        let texts = button_texts(&kb);

        assert_eq!(texts.len(), 4 + 1);
        assert!(texts.iter().any(|t| t.contains("Anterior")));
        assert!(!texts.iter().any(|t| t.contains("Próxima")));
    }

    #[test]
    fn test_single_page_has_no_navigation() {
        let kb = league_keyboard(&catalog(8), &BTreeSet::new(), 0);
        assert_eq!(button_texts(&kb).len(), 8);
    }

    #[test]
    fn test_toggle_flips_checkmark_on_same_page() {
        let catalog = catalog(20);
        let mut selected = BTreeSet::new();
        selected.insert(11);

        // League 11 sits on page 1
        let kb = league_keyboard(&catalog, &selected, 1);
        let texts = button_texts(&kb);
        assert!(texts.contains(&"✅ League 11".to_string()));

        selected.remove(&11);
        let kb = league_keyboard(&catalog, &selected, 1);
        let texts = button_texts(&kb);
        assert!(texts.contains(&"League 11".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("✅")));
    }

    #[test]
    fn test_buttons_carry_toggle_payload_for_their_page() {
        let kb = league_keyboard(&catalog(20), &BTreeSet::new(), 1);
        let first = &kb.inline_keyboard[0][0];

        assert_eq!(
            MenuAction::decode(callback_data(first)),
            Some(MenuAction::Toggle { page: 1, league_id: 9 })
        );
    }
}
