use std::collections::HashMap;

use serde_json::Value;

/// Metric names as they appear in the statistics endpoint
pub const CORNER_KICKS: &str = "Corner Kicks";
pub const BALL_POSSESSION: &str = "Ball Possession";
pub const YELLOW_CARDS: &str = "Yellow Cards";
pub const SHOTS_ON_GOAL: &str = "Shots on Goal";

/// Per-fixture statistics: metric name -> (home, away)
///
/// Lookups are case-insensitive and total: a metric the API did not
/// report reads as (0, 0).
#[derive(Debug, Clone, Default)]
pub struct StatBlock {
    metrics: HashMap<String, (i64, i64)>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: &str, home: i64, away: i64) {
        self.metrics.insert(metric.to_lowercase(), (home, away));
    }

    /// (home, away) for a metric, (0, 0) when absent
    pub fn get(&self, metric: &str) -> (i64, i64) {
        self.metrics
            .get(&metric.to_lowercase())
            .copied()
            .unwrap_or((0, 0))
    }

    pub fn corners_total(&self) -> i64 {
        let (h, a) = self.get(CORNER_KICKS);
        h + a
    }
}

/// Coerce a statistics value to an integer.
///
/// The upstream API mixes numbers, percent strings ("52%"), plain numeric
/// strings and nulls in the same field. Anything unreadable counts as 0.
pub fn coerce_stat(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_metric_reads_zero() {
        let stats = StatBlock::new();
        assert_eq!(stats.get(CORNER_KICKS), (0, 0));
        assert_eq!(stats.corners_total(), 0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut stats = StatBlock::new();
        stats.insert("Corner Kicks", 3, 2);
        assert_eq!(stats.get("corner kicks"), (3, 2));
        assert_eq!(stats.get("CORNER KICKS"), (3, 2));
        assert_eq!(stats.corners_total(), 5);
    }

    #[test]
    fn test_coerce_stat() {
        assert_eq!(coerce_stat(&json!(7)), 7);
        assert_eq!(coerce_stat(&json!(1.4)), 1);
        assert_eq!(coerce_stat(&json!("52%")), 52);
        assert_eq!(coerce_stat(&json!("5")), 5);
        assert_eq!(coerce_stat(&json!(null)), 0);
        assert_eq!(coerce_stat(&json!("n/a")), 0);
    }
}
