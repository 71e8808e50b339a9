//! Forward-looking time window over fixture kickoffs.
//!
//! All comparisons happen on timezone-aware UTC instants; conversion to the
//! display timezone is the formatter's job and never influences filtering.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::models::Fixture;

/// A kickoff timestamp the upstream API sent in a shape we cannot read
#[derive(Debug, Error)]
#[error("unparseable kickoff timestamp: {0:?}")]
pub struct KickoffError(pub String);

/// Parse an ISO-8601 kickoff timestamp (with `Z` or an explicit offset)
/// into a UTC instant. Total: every input yields either an aware instant
/// or a typed error, never a naive datetime.
pub fn parse_kickoff(raw: &str) -> Result<DateTime<Utc>, KickoffError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| KickoffError(raw.to_string()))
}

/// Whether `kickoff` falls inside `[now, now + window_hours]`, inclusive
/// on both ends.
pub fn in_window(kickoff: DateTime<Utc>, now: DateTime<Utc>, window_hours: u32) -> bool {
    let limit = now + Duration::hours(window_hours as i64);
    now <= kickoff && kickoff <= limit
}

/// Retain fixtures whose kickoff falls inside the window
pub fn filter_upcoming(
    fixtures: Vec<Fixture>,
    now: DateTime<Utc>,
    window_hours: u32,
) -> Vec<Fixture> {
    fixtures
        .into_iter()
        .filter(|f| in_window(f.kickoff, now, window_hours))
        .collect()
}

/// UTC dates whose fixture lists can contain window candidates: today,
/// plus every following day the window reaches into.
pub fn fetch_dates(now: DateTime<Utc>, window_hours: u32) -> Vec<NaiveDate> {
    let today = now.date_naive();
    let end = (now + Duration::hours(window_hours as i64)).date_naive();

    let days = (end - today).num_days().max(0);
    (0..=days)
        .map(|offset| today + Duration::days(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, TeamRef};
    use chrono::TimeZone;

    fn fixture_at(kickoff: DateTime<Utc>) -> Fixture {
        Fixture {
            id: 1,
            league_id: 39,
            league_name: "Premier League".to_string(),
            season: None,
            kickoff,
            venue: None,
            home: TeamRef { id: 1, name: "A".to_string() },
            away: TeamRef { id: 2, name: "B".to_string() },
            goals_home: None,
            goals_away: None,
            status: MatchStatus::default(),
        }
    }

    #[test]
    fn test_parse_kickoff_normalizes_to_utc() {
        let z = parse_kickoff("2024-01-01T10:00:00Z").unwrap();
        let offset = parse_kickoff("2024-01-01T07:00:00-03:00").unwrap();
        assert_eq!(z, offset);
    }

    #[test]
    fn test_parse_kickoff_rejects_naive_timestamps() {
        assert!(parse_kickoff("2024-01-01T10:00:00").is_err());
        assert!(parse_kickoff("not a date").is_err());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        let at_now = now;
        let at_limit = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        let past_limit = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 1).unwrap();
        let before_now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 59, 59).unwrap();

        assert!(in_window(at_now, now, 3));
        assert!(in_window(at_limit, now, 3));
        assert!(!in_window(past_limit, now, 3));
        assert!(!in_window(before_now, now, 3));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let fixtures = vec![
            fixture_at(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()),
            fixture_at(Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap()),
            fixture_at(Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap()),
        ];

        let once = filter_upcoming(fixtures, now, 3);
        let ids: Vec<_> = once.iter().map(|f| f.kickoff).collect();
        let twice = filter_upcoming(once, now, 3);

        assert_eq!(twice.iter().map(|f| f.kickoff).collect::<Vec<_>>(), ids);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn test_fetch_dates_cross_midnight() {
        let afternoon = Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap();
        assert_eq!(fetch_dates(afternoon, 3).len(), 1);

        let late = Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 0).unwrap();
        let dates = fetch_dates(late, 3);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        // A wide window covers every intermediate day
        let dates = fetch_dates(late, 30);
        assert_eq!(dates.len(), 3);
    }
}
