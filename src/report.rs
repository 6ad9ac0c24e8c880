//! Trend report assembly
//!
//! The format-agnostic in-memory structure handed to rendering
//! collaborators (CSV/Excel/chart output lives outside this crate). Carries
//! the scored trend records, the raw window snapshots, and the run summary
//! so that skipped or failed records are never silently lost.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{DailySnapshot, RunSummary, TrendRecord};

/// Complete output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    /// Store identifier of the analyzed app
    pub app_id: String,

    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// First and last calendar dates covered by the window
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,

    /// Scored trends, ordered by descending absolute delta
    pub records: Vec<TrendRecord>,

    /// The raw window contents, ascending by date (gap days included)
    pub snapshots: Vec<DailySnapshot>,

    /// Failure and skip tallies for the run
    pub summary: RunSummary,
}

impl TrendReport {
    /// Number of distinct topics in the report
    #[must_use]
    pub fn topics_tracked(&self) -> usize {
        self.records.len()
    }

    /// Total topic mentions across the window
    #[must_use]
    pub fn total_mentions(&self) -> u64 {
        self.records
            .iter()
            .map(|r| r.current_count + r.previous_count)
            .sum()
    }

    /// Total reviews reflected in the window (including zero-topic reviews)
    #[must_use]
    pub fn total_reviews(&self) -> u64 {
        self.snapshots.iter().map(|s| s.review_count).sum()
    }

    /// The top `n` records by absolute delta
    #[must_use]
    pub fn top(&self, n: usize) -> &[TrendRecord] {
        &self.records[..self.records.len().min(n)]
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TopicKey, TrendDirection};

    fn report() -> TrendReport {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        TrendReport {
            app_id: "in.swiggy.android".to_string(),
            generated_at: Utc::now(),
            window_start: date,
            window_end: date,
            records: vec![TrendRecord {
                topic: TopicKey::new("app crashing"),
                current_count: 5,
                previous_count: 1,
                delta: 4,
                direction: TrendDirection::Rising,
                avg_sentiment: -0.8,
            }],
            snapshots: vec![DailySnapshot::empty(date)],
            summary: RunSummary::default(),
        }
    }

    #[test]
    fn test_aggregate_accessors() {
        let report = report();
        assert_eq!(report.topics_tracked(), 1);
        assert_eq!(report.total_mentions(), 6);
        assert_eq!(report.top(10).len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let report = report();
        let json = report.to_json().unwrap();
        let back: TrendReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records[0].direction, TrendDirection::Rising);
        assert_eq!(back.records[0].topic.as_str(), "app crashing");
    }
}
