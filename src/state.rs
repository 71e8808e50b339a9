use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::FootballApiClient;
use crate::config::Config;
use crate::models::League;

/// Runtime-mutable bot settings.
///
/// Owned by the dispatcher behind a lock and mutated only by `/config`
/// and the league menu. Never persisted across restarts.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Forward-looking window for "upcoming" fixtures, in hours
    pub window_hours: u32,

    /// Whether the auto-send timer actually sends on each firing
    pub auto_enabled: bool,

    /// League allow-list; empty means no filter
    pub leagues: BTreeSet<u32>,
}

impl Settings {
    pub fn new(config: &Config) -> Self {
        Self {
            window_hours: config.window_hours,
            auto_enabled: false,
            leagues: BTreeSet::new(),
        }
    }

    /// Flip a league's membership in the filter. Returns the new state.
    pub fn toggle_league(&mut self, league_id: u32) -> bool {
        if self.leagues.remove(&league_id) {
            false
        } else {
            self.leagues.insert(league_id);
            true
        }
    }
}

/// Shared handles passed into every handler and worker
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<FootballApiClient>,
    pub settings: Arc<RwLock<Settings>>,
    pub catalog: Arc<RwLock<Vec<League>>>,
}
