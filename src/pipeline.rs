//! Composition of fetch, extract, filter and format into the message each
//! command (and the auto-send timer) delivers.
//!
//! Every function here is total: upstream failures degrade to empty data
//! with a warning, so callers always get some renderable text back.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::warn;

use crate::api::FootballApiClient;
use crate::config::{Config, TrendPolicy};
use crate::format::{self, TrendEntry};
use crate::models::{Fixture, FixtureOdds, StatBlock};
use crate::state::Settings;
use crate::window;

/// Detailed live view: every in-play fixture with stats and odds
pub async fn live_view(client: &FootballApiClient, settings: &Settings, config: &Config) -> String {
    let fixtures = live_fixtures(client, settings).await;

    let mut items = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        let stats = stats_or_empty(client, fixture.id).await;
        let odds = odds_or_empty(client, fixture.id).await;
        items.push((fixture, stats, odds));
    }

    format::live_report(&items, config.local_tz)
}

/// Upcoming view: fixtures kicking off inside the configured window
pub async fn upcoming_view(
    client: &FootballApiClient,
    settings: &Settings,
    config: &Config,
    now: DateTime<Utc>,
) -> String {
    let fixtures = upcoming_fixtures(client, settings, now).await;
    format::upcoming_report(&fixtures, settings.window_hours, config.local_tz)
}

/// Trend view: live fixtures flagged by the configured corner policy
pub async fn trend_view(client: &FootballApiClient, settings: &Settings, config: &Config) -> String {
    let fixtures = live_fixtures(client, settings).await;

    let entries = match config.trend_policy {
        TrendPolicy::LiveCorners => {
            let mut items = Vec::with_capacity(fixtures.len());
            for fixture in fixtures {
                let stats = stats_or_empty(client, fixture.id).await;
                items.push((fixture, stats));
            }
            trend_entries(&items, config.trend_corner_threshold)
        }
        TrendPolicy::SeasonAverage => {
            let mut items = Vec::new();
            for fixture in fixtures {
                if !average_eligible(&fixture, config.trend_min_elapsed) {
                    continue;
                }

                let season = fixture.season.unwrap_or(config.season);
                let home =
                    team_corners_or_zero(client, fixture.home.id, fixture.league_id, season).await;
                let away =
                    team_corners_or_zero(client, fixture.away.id, fixture.league_id, season).await;
                items.push((fixture, home + away));
            }
            average_trend_entries(&items, config.trend_avg_threshold)
        }
    };

    format::trend_report(&entries)
}

/// Odds view: goals and corners markets for live and upcoming fixtures
pub async fn odds_view(
    client: &FootballApiClient,
    settings: &Settings,
    config: &Config,
    now: DateTime<Utc>,
) -> String {
    let live = with_odds(client, live_fixtures(client, settings).await).await;
    let upcoming = with_odds(client, upcoming_fixtures(client, settings, now).await).await;

    format::odds_report(&live, &upcoming, settings.window_hours, config.local_tz)
}

/// Apply the corner-trend policy: keep fixtures whose combined corner
/// count is at or above the threshold (inclusive).
pub fn trend_entries(items: &[(Fixture, StatBlock)], threshold: i64) -> Vec<TrendEntry> {
    items
        .iter()
        .filter(|(_, stats)| stats.corners_total() >= threshold)
        .map(|(fixture, stats)| TrendEntry {
            home: fixture.home.name.clone(),
            away: fixture.away.name.clone(),
            corners: stats.corners_total(),
        })
        .collect()
}

/// Gate for the season-average policy: a fixture only qualifies once it
/// has run the minimum elapsed minutes
pub fn average_eligible(fixture: &Fixture, min_elapsed: i64) -> bool {
    fixture
        .status
        .elapsed
        .map(|elapsed| elapsed >= min_elapsed)
        .unwrap_or(false)
}

/// Keep fixtures whose combined season corner total is at or above the
/// threshold (inclusive)
pub fn average_trend_entries(items: &[(Fixture, i64)], threshold: i64) -> Vec<TrendEntry> {
    items
        .iter()
        .filter(|(_, total)| *total >= threshold)
        .map(|(fixture, total)| TrendEntry {
            home: fixture.home.name.clone(),
            away: fixture.away.name.clone(),
            corners: *total,
        })
        .collect()
}

async fn team_corners_or_zero(
    client: &FootballApiClient,
    team_id: i64,
    league_id: u32,
    season: i32,
) -> i64 {
    match client.fetch_team_corner_total(team_id, league_id, season).await {
        Ok(total) => total,
        Err(e) => {
            warn!("Season corners unavailable for team {}: {}", team_id, e);
            0
        }
    }
}

async fn live_fixtures(client: &FootballApiClient, settings: &Settings) -> Vec<Fixture> {
    let fixtures = match client.fetch_live_fixtures(&settings.leagues).await {
        Ok(fixtures) => fixtures,
        Err(e) => {
            warn!("Live fixtures unavailable: {}", e);
            Vec::new()
        }
    };

    retain_leagues(fixtures, &settings.leagues)
}

async fn upcoming_fixtures(
    client: &FootballApiClient,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<Fixture> {
    let mut all = Vec::new();

    for date in window::fetch_dates(now, settings.window_hours) {
        match client.fetch_fixtures_by_date(date, &settings.leagues).await {
            Ok(fixtures) => all.extend(fixtures),
            Err(e) => warn!("Fixtures for {} unavailable: {}", date, e),
        }
    }

    let all = retain_leagues(all, &settings.leagues);
    window::filter_upcoming(all, now, settings.window_hours)
}

/// League filter is already sent as a query parameter; re-applying it
/// here keeps foreign leagues out of rendered output no matter what the
/// upstream returns.
fn retain_leagues(fixtures: Vec<Fixture>, leagues: &BTreeSet<u32>) -> Vec<Fixture> {
    if leagues.is_empty() {
        return fixtures;
    }
    fixtures
        .into_iter()
        .filter(|f| leagues.contains(&f.league_id))
        .collect()
}

async fn with_odds(
    client: &FootballApiClient,
    fixtures: Vec<Fixture>,
) -> Vec<(Fixture, FixtureOdds)> {
    let mut items = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        let odds = odds_or_empty(client, fixture.id).await;
        items.push((fixture, odds));
    }
    items
}

async fn stats_or_empty(client: &FootballApiClient, fixture_id: i64) -> StatBlock {
    match client.fetch_statistics(fixture_id).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Statistics unavailable for fixture {}: {}", fixture_id, e);
            StatBlock::new()
        }
    }
}

async fn odds_or_empty(client: &FootballApiClient, fixture_id: i64) -> FixtureOdds {
    match client.fetch_odds(fixture_id).await {
        Ok(odds) => odds,
        Err(e) => {
            warn!("Odds unavailable for fixture {}: {}", fixture_id, e);
            FixtureOdds::default()
        }
    }
}
