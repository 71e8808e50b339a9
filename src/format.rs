//! Markdown renderers for every bot view.
//!
//! Pure functions over already-fetched data. The Portuguese templates,
//! emoji and separators are a presentation contract with the Telegram
//! Markdown renderer and mirror the messages users already receive.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::stats::{BALL_POSSESSION, CORNER_KICKS, SHOTS_ON_GOAL, YELLOW_CARDS};
use crate::models::{Fixture, FixtureOdds, League, OddsLine, StatBlock};
use crate::state::Settings;

/// Display cap for over/under odds lines per market
const ODDS_LINES_PER_MARKET: usize = 2;

const SEPARATOR: &str = "————————————";

/// Kickoff time in the display timezone
pub fn local_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// Welcome / help text listing every command
pub fn help_text() -> String {
    "👋 *Robô de Monitoramento de Jogos* ⚽\n\n\
     /jogos – Jogos ao vivo com estatísticas e odds\n\
     /proximos – Jogos dentro da janela configurada\n\
     /tendencias – Tendências de escanteios\n\
     /odds – Odds de gols e escanteios\n\
     /liga – Filtrar ligas\n\
     /config – Mostrar/ajustar configuração\n\
     /ajuda – Este menu"
        .to_string()
}

/// Detailed live view: one block per fixture with stats and odds
pub fn live_report(items: &[(Fixture, StatBlock, FixtureOdds)], tz: Tz) -> String {
    if items.is_empty() {
        return "❌ Nenhum jogo ao vivo no momento.".to_string();
    }

    let blocks: Vec<String> = items
        .iter()
        .map(|(fixture, stats, odds)| live_fixture_block(fixture, stats, odds, tz))
        .collect();

    format!("📺 *Jogos ao Vivo Agora:*\n\n{}", blocks.join("\n\n"))
}

fn live_fixture_block(fixture: &Fixture, stats: &StatBlock, odds: &FixtureOdds, tz: Tz) -> String {
    let mut block = format!(
        "*{}*\n{}\n⏱️ {} | 🕒 {}",
        fixture.league_name,
        fixture.score_line(),
        fixture.clock(),
        local_time(fixture.kickoff, tz),
    );

    if let Some(venue) = &fixture.venue {
        block.push_str(&format!("\n🏟️ {}", venue));
    }

    let (ch, ca) = stats.get(CORNER_KICKS);
    let (ph, pa) = stats.get(BALL_POSSESSION);
    let (yh, ya) = stats.get(YELLOW_CARDS);
    let (sh, sa) = stats.get(SHOTS_ON_GOAL);
    block.push_str(&format!(
        "\nEsc: {} | Pos: {}%–{}% | 🟨 {}–{} | 🎯 {}–{}",
        ch + ca,
        ph,
        pa,
        yh,
        ya,
        sh,
        sa
    ));

    block.push('\n');
    block.push_str(&winner_line(odds));
    block.push('\n');
    block.push_str(SEPARATOR);
    block
}

fn winner_line(odds: &FixtureOdds) -> String {
    let winner = match &odds.winner {
        Some(w) if !w.outcomes.is_empty() => w,
        _ => return "🎰 _Odds indisponíveis_".to_string(),
    };

    let prices: Vec<String> = winner
        .outcomes
        .iter()
        .map(|o| format!("{}: {:.2}", o.side.as_str(), o.price))
        .collect();

    let mut line = format!("🎰 {}", prices.join(" | "));
    if let Some(tip) = winner.tip() {
        line.push_str(&format!(" → 💡 {}", tip.label));
    }
    line
}

/// Upcoming view: fixtures inside the configured window
pub fn upcoming_report(fixtures: &[Fixture], window_hours: u32, tz: Tz) -> String {
    if fixtures.is_empty() {
        return format!(
            "❌ Nenhum jogo encontrado para as próximas {} horas.",
            window_hours
        );
    }

    let lines: Vec<String> = fixtures
        .iter()
        .map(|f| {
            format!(
                "🕒 {} | {}\n{} x {}\n",
                local_time(f.kickoff, tz),
                f.league_name,
                f.home.name,
                f.away.name
            )
        })
        .collect();

    format!(
        "📅 *Jogos nas próximas {} horas:*\n\n{}",
        window_hours,
        lines.join("\n")
    )
}

/// A fixture flagged by the corner-trend policy
#[derive(Debug, Clone, PartialEq)]
pub struct TrendEntry {
    pub home: String,
    pub away: String,
    pub corners: i64,
}

/// Trend view: fixtures whose combined corner count reached the threshold
pub fn trend_report(entries: &[TrendEntry]) -> String {
    let body = if entries.is_empty() {
        "_Nenhum_".to_string()
    } else {
        entries
            .iter()
            .map(|e| format!("🔥 {} x {} ({} escanteios)", e.home, e.away, e.corners))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("📊 *Tendências de escanteios:*\n{}", body)
}

/// Odds view: live and upcoming sections with goals/corners markets
pub fn odds_report(
    live: &[(Fixture, FixtureOdds)],
    upcoming: &[(Fixture, FixtureOdds)],
    window_hours: u32,
    tz: Tz,
) -> String {
    let mut sections = vec!["📊 *Odds de Gols e Escanteios:*\n".to_string()];
    let mut any_odds = false;

    let upcoming_title = format!("⏳ *Jogos Próximos (até {}h):*", window_hours);

    for (title, items) in [
        ("📺 *Jogos Ao Vivo:*", live),
        (upcoming_title.as_str(), upcoming),
    ] {
        sections.push(title.to_string());

        let mut section_body = Vec::new();
        for (fixture, odds) in items {
            if let Some(block) = odds_fixture_block(fixture, odds, tz) {
                section_body.push(block);
                any_odds = true;
            }
        }

        if section_body.is_empty() {
            sections.push("_Nenhum jogo encontrado._".to_string());
        } else {
            sections.extend(section_body);
        }
    }

    if !any_odds {
        sections.push("Sem odds disponíveis no momento.".to_string());
    }

    sections.join("\n")
}

/// Per-fixture odds block, None when the fixture has no matched market
fn odds_fixture_block(fixture: &Fixture, odds: &FixtureOdds, tz: Tz) -> Option<String> {
    if odds.goals.is_none() && odds.corners.is_none() {
        return None;
    }

    let mut block = format!(
        "🕒 {} - ⚽ *{} x {}*\n",
        local_time(fixture.kickoff, tz),
        fixture.home.name,
        fixture.away.name
    );

    if let Some(goals) = &odds.goals {
        for line in top_lines(goals) {
            block.push_str(&format!("  ⚽ Gols {}: {}\n", line.label, line.odd));
        }
    }
    if let Some(corners) = &odds.corners {
        for line in top_lines(corners) {
            block.push_str(&format!("  🥅 Escanteios {}: {}\n", line.label, line.odd));
        }
    }

    Some(block)
}

fn top_lines(lines: &[OddsLine]) -> &[OddsLine] {
    &lines[..lines.len().min(ODDS_LINES_PER_MARKET)]
}

/// Config view: current settings plus the resolved league filter names
pub fn settings_report(settings: &Settings, catalog: &[League]) -> String {
    let leagues = if settings.leagues.is_empty() {
        "todas".to_string()
    } else {
        settings
            .leagues
            .iter()
            .map(|id| {
                catalog
                    .iter()
                    .find(|l| l.id == *id)
                    .map(|l| l.label())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "⚙️ *Config:*\nJanela: {}h\nLigas: {}\nAuto envio: {}",
        settings.window_hours,
        leagues,
        if settings.auto_enabled { "on" } else { "off" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, TeamRef};
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn tz() -> Tz {
        "America/Sao_Paulo".parse().unwrap()
    }

    fn fixture(home: &str, away: &str) -> Fixture {
        Fixture {
            id: 1,
            league_id: 39,
            league_name: "Premier League".to_string(),
            season: None,
            kickoff: Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(),
            venue: Some("Anfield".to_string()),
            home: TeamRef { id: 1, name: home.to_string() },
            away: TeamRef { id: 2, name: away.to_string() },
            goals_home: Some(1),
            goals_away: Some(0),
            status: MatchStatus { phase: Some("2H".to_string()), elapsed: Some(63) },
        }
    }

    #[test]
    fn test_local_time_conversion() {
        // 18:00 UTC is 15:00 in São Paulo
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
        assert_eq!(local_time(instant, tz()), "15:00");
    }

    #[test]
    fn test_live_report_empty_placeholder() {
        assert_eq!(live_report(&[], tz()), "❌ Nenhum jogo ao vivo no momento.");
    }

    #[test]
    fn test_live_report_renders_stats_and_tip() {
        let mut stats = StatBlock::new();
        stats.insert(CORNER_KICKS, 3, 2);
        stats.insert(BALL_POSSESSION, 60, 40);

        let odds = FixtureOdds::from_bookmakers(&[]);
        let report = live_report(&[(fixture("A", "B"), stats, odds)], tz());

        assert!(report.contains("A 1 x 0 B"));
        assert!(report.contains("Esc: 5"));
        assert!(report.contains("Pos: 60%–40%"));
        assert!(report.contains("⏱️ 63min"));
        assert!(report.contains("_Odds indisponíveis_"));
    }

    #[test]
    fn test_upcoming_report_placeholder_and_lines() {
        assert!(upcoming_report(&[], 3, tz()).contains("Nenhum jogo encontrado"));

        let report = upcoming_report(&[fixture("A", "B")], 3, tz());
        assert!(report.contains("📅 *Jogos nas próximas 3 horas:*"));
        assert!(report.contains("A x B"));
    }

    #[test]
    fn test_trend_report() {
        assert!(trend_report(&[]).contains("_Nenhum_"));

        let entries = vec![TrendEntry {
            home: "A".to_string(),
            away: "B".to_string(),
            corners: 5,
        }];
        let report = trend_report(&entries);
        assert!(report.contains("🔥 A x B (5 escanteios)"));
    }

    #[test]
    fn test_odds_report_caps_lines_per_market() {
        let books = vec![crate::models::Bookmaker {
            name: None,
            bets: vec![crate::models::odds::Bet {
                name: "Total Goals".to_string(),
                values: vec![
                    crate::models::odds::BetValue {
                        value: serde_json::json!("Over 1.5"),
                        odd: "1.30".to_string(),
                    },
                    crate::models::odds::BetValue {
                        value: serde_json::json!("Over 2.5"),
                        odd: "1.85".to_string(),
                    },
                    crate::models::odds::BetValue {
                        value: serde_json::json!("Over 3.5"),
                        odd: "2.90".to_string(),
                    },
                ],
            }],
        }];
        let odds = FixtureOdds::from_bookmakers(&books);

        let report = odds_report(&[(fixture("A", "B"), odds)], &[], 3, tz());
        assert!(report.contains("Gols Over 1.5"));
        assert!(report.contains("Gols Over 2.5"));
        assert!(!report.contains("Over 3.5"));
        // Upcoming section is empty and says so
        assert!(report.contains("_Nenhum jogo encontrado._"));
    }

    #[test]
    fn test_odds_report_all_empty() {
        let report = odds_report(&[], &[], 3, tz());
        assert!(report.contains("Sem odds disponíveis no momento."));
    }

    #[test]
    fn test_settings_report_resolves_league_names() {
        let catalog = vec![League {
            id: 39,
            name: "Premier League".to_string(),
            country: Some("England".to_string()),
        }];
        let mut leagues = BTreeSet::new();
        leagues.insert(39);

        let settings = Settings { window_hours: 3, auto_enabled: false, leagues };
        let report = settings_report(&settings, &catalog);
        assert!(report.contains("Premier League (England)"));
        assert!(report.contains("Auto envio: off"));

        let settings = Settings {
            window_hours: 5,
            auto_enabled: true,
            leagues: BTreeSet::new(),
        };
        let report = settings_report(&settings, &catalog);
        assert!(report.contains("Janela: 5h"));
        assert!(report.contains("Ligas: todas"));
        assert!(report.contains("Auto envio: on"));
    }
}
