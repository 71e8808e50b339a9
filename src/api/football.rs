use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Bookmaker, Fixture, FixtureOdds, League, MatchStatus, StatBlock, TeamRef};
use crate::models::stats::coerce_stat;
use crate::window;

/// Every outbound call shares one short timeout so a slow upstream can
/// never block the dispatcher indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the API-Football v3 REST API
pub struct FootballApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: FixtureMeta,
    league: LeagueMeta,
    teams: FixtureTeams,
    #[serde(default)]
    goals: FixtureGoals,
}

#[derive(Debug, Deserialize)]
struct FixtureMeta {
    id: i64,
    date: String,
    #[serde(default)]
    venue: Option<VenueMeta>,
    #[serde(default)]
    status: Option<StatusMeta>,
}

#[derive(Debug, Deserialize)]
struct VenueMeta {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusMeta {
    short: Option<String>,
    elapsed: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LeagueMeta {
    id: u32,
    name: String,
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct FixtureTeams {
    home: TeamMeta,
    away: TeamMeta,
}

#[derive(Debug, Deserialize)]
struct TeamMeta {
    id: i64,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct FixtureGoals {
    home: Option<i64>,
    away: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StatisticsEntry {
    #[serde(default)]
    statistics: Vec<StatisticItem>,
}

#[derive(Debug, Deserialize)]
struct StatisticItem {
    #[serde(rename = "type")]
    stat_type: String,
    #[serde(default)]
    value: serde_json::Value,
}

/// Envelope of the team statistics endpoint, which wraps one object
/// instead of an array
#[derive(Debug, Deserialize)]
struct TeamStatsEnvelope {
    #[serde(default)]
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OddsEntry {
    #[serde(default)]
    bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    league: LeagueInfo,
    #[serde(default)]
    country: Option<CountryInfo>,
}

#[derive(Debug, Deserialize)]
struct LeagueInfo {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CountryInfo {
    name: Option<String>,
}

/// Query parameters for the fixtures endpoint. Pure so the outbound
/// request shape stays testable.
fn fixture_query(
    live: bool,
    date: Option<NaiveDate>,
    leagues: &BTreeSet<u32>,
) -> Vec<(String, String)> {
    let mut params = Vec::new();

    if live {
        params.push(("live".to_string(), "all".to_string()));
    }
    if let Some(date) = date {
        params.push(("date".to_string(), date.format("%Y-%m-%d").to_string()));
    }
    if !leagues.is_empty() {
        let ids: Vec<String> = leagues.iter().map(|id| id.to_string()).collect();
        params.push(("league".to_string(), ids.join(",")));
    }

    params
}

impl FootballApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch all fixtures currently in play
    pub async fn fetch_live_fixtures(&self, leagues: &BTreeSet<u32>) -> Result<Vec<Fixture>> {
        self.fetch_fixtures(fixture_query(true, None, leagues)).await
    }

    /// Fetch the fixture list for one calendar date
    pub async fn fetch_fixtures_by_date(
        &self,
        date: NaiveDate,
        leagues: &BTreeSet<u32>,
    ) -> Result<Vec<Fixture>> {
        self.fetch_fixtures(fixture_query(false, Some(date), leagues))
            .await
    }

    async fn fetch_fixtures(&self, params: Vec<(String, String)>) -> Result<Vec<Fixture>> {
        let entries: Vec<FixtureEntry> = self.get("fixtures", &params).await?;

        let mut fixtures = Vec::with_capacity(entries.len());
        for entry in entries {
            match convert_fixture(entry) {
                Ok(fixture) => fixtures.push(fixture),
                Err(e) => warn!("Skipping fixture with bad kickoff: {}", e),
            }
        }

        debug!("Fetched {} fixtures", fixtures.len());
        Ok(fixtures)
    }

    /// Fetch per-team statistics for one fixture. Entry 0 is the home
    /// team, entry 1 the away team; anything missing reads as zero.
    pub async fn fetch_statistics(&self, fixture_id: i64) -> Result<StatBlock> {
        let params = vec![("fixture".to_string(), fixture_id.to_string())];
        let entries: Vec<StatisticsEntry> = self.get("fixtures/statistics", &params).await?;

        let mut stats = StatBlock::new();

        if let Some(home) = entries.first() {
            for item in &home.statistics {
                let home_value = coerce_stat(&item.value);
                let away_value = entries
                    .get(1)
                    .and_then(|away| {
                        away.statistics
                            .iter()
                            .find(|i| i.stat_type.eq_ignore_ascii_case(&item.stat_type))
                    })
                    .map(|i| coerce_stat(&i.value))
                    .unwrap_or(0);

                stats.insert(&item.stat_type, home_value, away_value);
            }
        }

        Ok(stats)
    }

    /// Fetch the bookmaker odds for one fixture
    pub async fn fetch_odds(&self, fixture_id: i64) -> Result<FixtureOdds> {
        let params = vec![("fixture".to_string(), fixture_id.to_string())];
        let entries: Vec<OddsEntry> = self.get("odds", &params).await?;

        let bookmakers = entries
            .into_iter()
            .next()
            .map(|e| e.bookmakers)
            .unwrap_or_default();

        Ok(FixtureOdds::from_bookmakers(&bookmakers))
    }

    /// Fetch a team's season corner total for one league. Missing or
    /// malformed statistics read as 0.
    pub async fn fetch_team_corner_total(
        &self,
        team_id: i64,
        league_id: u32,
        season: i32,
    ) -> Result<i64> {
        let params = vec![
            ("team".to_string(), team_id.to_string()),
            ("season".to_string(), season.to_string()),
            ("league".to_string(), league_id.to_string()),
        ];

        let url = format!("{}/teams/statistics", self.base_url);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("x-apisports-key", &self.api_key)
            .send()
            .await
            .context("Request to teams/statistics failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("API error on teams/statistics: {} - {}", status, text);
            return Ok(0);
        }

        let envelope: TeamStatsEnvelope = response
            .json()
            .await
            .context("Failed to parse teams/statistics response")?;

        Ok(corner_total(&envelope.response))
    }

    /// Fetch the league catalog for a season
    pub async fn fetch_leagues(&self, season: i32) -> Result<Vec<League>> {
        let params = vec![("season".to_string(), season.to_string())];
        let entries: Vec<LeagueEntry> = self.get("leagues", &params).await?;

        Ok(entries
            .into_iter()
            .map(|e| League {
                id: e.league.id,
                name: e.league.name,
                country: e.country.and_then(|c| c.name),
            })
            .collect())
    }

    /// Issue one GET and unwrap the `{"response": [...]}` envelope.
    /// Non-2xx statuses degrade to an empty list with a warning.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("x-apisports-key", &self.api_key)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("API error on {}: {} - {}", endpoint, status, text);
            return Ok(Vec::new());
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", endpoint))?;

        Ok(envelope.response)
    }
}

/// Corner total within the team statistics payload:
/// `statistics.corners.total.total`
fn corner_total(response: &serde_json::Value) -> i64 {
    response
        .pointer("/statistics/corners/total/total")
        .map(coerce_stat)
        .unwrap_or(0)
}

fn convert_fixture(entry: FixtureEntry) -> Result<Fixture, window::KickoffError> {
    let kickoff = window::parse_kickoff(&entry.fixture.date)?;
    let status = entry.fixture.status.unwrap_or(StatusMeta {
        short: None,
        elapsed: None,
    });

    Ok(Fixture {
        id: entry.fixture.id,
        league_id: entry.league.id,
        league_name: entry.league.name,
        season: entry.league.season,
        kickoff,
        venue: entry.fixture.venue.and_then(|v| v.name),
        home: TeamRef {
            id: entry.teams.home.id,
            name: entry.teams.home.name,
        },
        away: TeamRef {
            id: entry.teams.away.id,
            name: entry.teams.away.name,
        },
        goals_home: entry.goals.home,
        goals_away: entry.goals.away,
        status: MatchStatus {
            phase: status.short,
            elapsed: status.elapsed,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixture_query_live_with_league_filter() {
        let mut leagues = BTreeSet::new();
        leagues.insert(39);

        let params = fixture_query(true, None, &leagues);
        assert!(params.contains(&("live".to_string(), "all".to_string())));
        assert!(params.contains(&("league".to_string(), "39".to_string())));
    }

    #[test]
    fn test_fixture_query_date_joins_league_ids() {
        let mut leagues = BTreeSet::new();
        leagues.insert(71);
        leagues.insert(39);

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let params = fixture_query(false, Some(date), &leagues);

        assert!(params.contains(&("date".to_string(), "2024-01-01".to_string())));
        // BTreeSet keeps the id list ordered
        assert!(params.contains(&("league".to_string(), "39,71".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "live"));
    }

    #[test]
    fn test_fixture_query_empty_filter_omits_league() {
        let params = fixture_query(true, None, &BTreeSet::new());
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_corner_total_reads_nested_path() {
        let payload = json!({
            "statistics": {"corners": {"total": {"total": 112}}}
        });
        assert_eq!(corner_total(&payload), 112);

        // Missing branches and odd shapes read as zero
        assert_eq!(corner_total(&json!({})), 0);
        assert_eq!(corner_total(&json!({"statistics": {"corners": {}}})), 0);
        assert_eq!(
            corner_total(&json!({"statistics": {"corners": {"total": {"total": null}}}})),
            0
        );
    }

    #[test]
    fn test_convert_fixture_parses_kickoff() {
        let entry: FixtureEntry = serde_json::from_value(json!({
            "fixture": {
                "id": 868549,
                "date": "2024-01-01T13:00:00+00:00",
                "venue": {"name": "Anfield"},
                "status": {"short": "1H", "elapsed": 27}
            },
            "league": {"id": 39, "name": "Premier League", "season": 2023},
            "teams": {
                "home": {"id": 40, "name": "Liverpool"},
                "away": {"id": 42, "name": "Arsenal"}
            },
            "goals": {"home": 1, "away": 0}
        }))
        .unwrap();

        let fixture = convert_fixture(entry).unwrap();
        assert_eq!(fixture.id, 868549);
        assert_eq!(fixture.league_id, 39);
        assert_eq!(fixture.venue.as_deref(), Some("Anfield"));
        assert_eq!(fixture.status.elapsed, Some(27));
        assert_eq!(fixture.kickoff.to_rfc3339(), "2024-01-01T13:00:00+00:00");
    }

    #[test]
    fn test_convert_fixture_rejects_naive_kickoff() {
        let entry: FixtureEntry = serde_json::from_value(json!({
            "fixture": {"id": 1, "date": "2024-01-01 13:00"},
            "league": {"id": 39, "name": "PL", "season": null},
            "teams": {
                "home": {"id": 1, "name": "A"},
                "away": {"id": 2, "name": "B"}
            }
        }))
        .unwrap();

        assert!(convert_fixture(entry).is_err());
    }
}
