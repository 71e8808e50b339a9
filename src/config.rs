use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;

/// Which corner-trend policy flags a live fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPolicy {
    /// Combined live corner count from the fixture statistics
    LiveCorners,
    /// Combined season corner totals of both teams
    SeasonAverage,
}

impl FromStr for TrendPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "live" => Ok(TrendPolicy::LiveCorners),
            "average" => Ok(TrendPolicy::SeasonAverage),
            other => bail!("unknown trend policy: {:?} (expected live or average)", other),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// The three secrets are required and missing any of them aborts
/// startup with a message naming the variable. Everything else has a
/// default. Runtime-mutable knobs live in [`crate::state::Settings`].
#[derive(Debug, Clone)]
pub struct Config {
    /// API-Football key (`x-apisports-key` header)
    pub api_key: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Destination chat for auto-sent reports
    pub chat_id: i64,

    /// API-Football base URL
    pub api_base_url: String,

    /// Season year for the league catalog
    pub season: i32,

    /// Default forward-looking window in hours
    pub window_hours: u32,

    /// Seconds between auto-send timer firings
    pub auto_send_interval: u64,

    /// Trend policy applied by the trend view
    pub trend_policy: TrendPolicy,

    /// Combined live corner count that flags a fixture under the live
    /// policy (inclusive)
    pub trend_corner_threshold: i64,

    /// Combined season corner total that flags a fixture under the
    /// season-average policy (inclusive)
    pub trend_avg_threshold: i64,

    /// Minimum elapsed minutes before the season-average policy
    /// considers a fixture
    pub trend_min_elapsed: i64,

    /// Timezone used to display kickoff times
    pub local_tz: Tz,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let local_tz_name = env::var("LOCAL_TZ").unwrap_or_else(|_| "America/Sao_Paulo".to_string());

        Ok(Config {
            api_key: env::var("API_FOOTBALL_KEY").context("API_FOOTBALL_KEY must be set")?,

            telegram_token: env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN must be set")?,

            chat_id: env::var("CHAT_ID")
                .context("CHAT_ID must be set")?
                .parse()
                .context("CHAT_ID must be a valid chat identifier")?,

            api_base_url: env::var("API_FOOTBALL_BASE_URL")
                .unwrap_or_else(|_| "https://v3.football.api-sports.io".to_string()),

            season: env::var("LEAGUE_SEASON")
                .unwrap_or_else(|_| Utc::now().year().to_string())
                .parse()
                .context("LEAGUE_SEASON must be a valid year")?,

            window_hours: env::var("WINDOW_HOURS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("WINDOW_HOURS must be a valid number")?,

            auto_send_interval: env::var("AUTO_SEND_INTERVAL")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .context("AUTO_SEND_INTERVAL must be a valid number of seconds")?,

            trend_policy: env::var("TREND_POLICY")
                .unwrap_or_else(|_| "live".to_string())
                .parse()
                .context("TREND_POLICY must be live or average")?,

            trend_corner_threshold: env::var("TREND_CORNER_THRESHOLD")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("TREND_CORNER_THRESHOLD must be a valid number")?,

            trend_avg_threshold: env::var("TREND_AVG_THRESHOLD")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("TREND_AVG_THRESHOLD must be a valid number")?,

            trend_min_elapsed: env::var("TREND_MIN_ELAPSED")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("TREND_MIN_ELAPSED must be a valid number")?,

            local_tz: local_tz_name
                .parse()
                .ok()
                .context("LOCAL_TZ must be an IANA timezone name, e.g. America/Sao_Paulo")?,
        })
    }
}
