use serde::Deserialize;
use serde_json::Value;

/// One bookmaker entry from the odds endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bets: Vec<Bet>,
}

/// A single betting market offered by a bookmaker
#[derive(Debug, Clone, Deserialize)]
pub struct Bet {
    pub name: String,
    #[serde(default)]
    pub values: Vec<BetValue>,
}

/// One (outcome, price) pair within a market
#[derive(Debug, Clone, Deserialize)]
pub struct BetValue {
    /// Outcome label; the API mixes strings and numbers here
    pub value: Value,
    pub odd: String,
}

impl BetValue {
    pub fn label(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A displayable (outcome, price) line for an over/under style market
#[derive(Debug, Clone, PartialEq)]
pub struct OddsLine {
    pub label: String,
    pub odd: String,
}

/// Side of a three-way match-winner market
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerSide {
    Home,
    Draw,
    Away,
}

impl WinnerSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinnerSide::Home => "1",
            WinnerSide::Draw => "X",
            WinnerSide::Away => "2",
        }
    }
}

/// One priced outcome of the match-winner market, in response order
#[derive(Debug, Clone)]
pub struct WinnerOutcome {
    pub side: WinnerSide,
    pub label: String,
    pub price: f64,
}

/// Three-way match-winner odds
#[derive(Debug, Clone, Default)]
pub struct MatchWinnerOdds {
    pub outcomes: Vec<WinnerOutcome>,
}

impl MatchWinnerOdds {
    /// Lowest-priced outcome (the naive favorite). Ties keep the
    /// first-seen outcome.
    pub fn tip(&self) -> Option<&WinnerOutcome> {
        let mut best: Option<&WinnerOutcome> = None;
        for outcome in &self.outcomes {
            match best {
                Some(b) if outcome.price >= b.price => {}
                _ => best = Some(outcome),
            }
        }
        best
    }
}

/// Markets extracted for a single fixture.
///
/// Each slot is filled by the first matching bet found while scanning
/// bookmakers in response order; later bookmakers never override it.
#[derive(Debug, Clone, Default)]
pub struct FixtureOdds {
    pub goals: Option<Vec<OddsLine>>,
    pub corners: Option<Vec<OddsLine>>,
    pub winner: Option<MatchWinnerOdds>,
}

impl FixtureOdds {
    /// Extract the goals, corners and match-winner markets from the raw
    /// bookmakers array. Market names match by case-insensitive substring
    /// ("goal" matches "Total Goals"). Missing or unreadable markets stay
    /// None; zero bookmakers yield an all-None value.
    pub fn from_bookmakers(bookmakers: &[Bookmaker]) -> Self {
        let mut odds = FixtureOdds::default();

        for bookmaker in bookmakers {
            for bet in &bookmaker.bets {
                let name = bet.name.to_lowercase();

                if odds.goals.is_none() && name.contains("goal") {
                    odds.goals = Some(to_lines(&bet.values));
                } else if odds.corners.is_none() && name.contains("corner") {
                    odds.corners = Some(to_lines(&bet.values));
                } else if odds.winner.is_none() && name.contains("winner") {
                    odds.winner = Some(to_winner(&bet.values));
                }
            }
        }

        odds
    }
}

fn to_lines(values: &[BetValue]) -> Vec<OddsLine> {
    values
        .iter()
        .map(|v| OddsLine {
            label: v.label(),
            odd: v.odd.clone(),
        })
        .collect()
}

fn to_winner(values: &[BetValue]) -> MatchWinnerOdds {
    let mut outcomes = Vec::new();

    for v in values {
        let label = v.label();
        let lower = label.to_lowercase();

        let side = if lower.contains("home") {
            WinnerSide::Home
        } else if lower.contains("draw") {
            WinnerSide::Draw
        } else if lower.contains("away") {
            WinnerSide::Away
        } else {
            continue;
        };

        if let Ok(price) = v.odd.trim().parse::<f64>() {
            outcomes.push(WinnerOutcome { side, label, price });
        }
    }

    MatchWinnerOdds { outcomes }
}
