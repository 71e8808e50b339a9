use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scheduled or in-progress match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Fixture ID from API-Football
    pub id: i64,

    /// League ID
    pub league_id: u32,

    /// League/competition name
    pub league_name: String,

    /// Season year (if reported)
    pub season: Option<i32>,

    /// Kickoff instant (UTC)
    pub kickoff: DateTime<Utc>,

    /// Stadium name (if reported)
    pub venue: Option<String>,

    /// Home team
    pub home: TeamRef,

    /// Away team
    pub away: TeamRef,

    /// Current score, None before kickoff
    pub goals_home: Option<i64>,

    pub goals_away: Option<i64>,

    /// Match phase and clock
    pub status: MatchStatus,
}

/// Team reference within a fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
}

/// Match phase as reported by the upstream API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatus {
    /// Short phase code ("NS", "1H", "HT", "2H", "FT", ...)
    pub phase: Option<String>,

    /// Elapsed minutes, None when not started
    pub elapsed: Option<i64>,
}

impl Fixture {
    /// "Home 1 x 0 Away" with dashes before kickoff
    pub fn score_line(&self) -> String {
        match (self.goals_home, self.goals_away) {
            (Some(h), Some(a)) => format!("{} {} x {} {}", self.home.name, h, a, self.away.name),
            _ => format!("{} x {}", self.home.name, self.away.name),
        }
    }

    /// Clock text for display: elapsed minutes when live, phase code otherwise
    pub fn clock(&self) -> String {
        match self.status.elapsed {
            Some(min) => format!("{}min", min),
            None => self.status.phase.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}
