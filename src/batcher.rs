//! Daily batching of review streams
//!
//! Partitions an unordered review sequence into day-keyed batches using each
//! review's posting timestamp. Reviews without a usable timestamp are
//! excluded and tallied, never fatal. Days ascend; reviews within a day keep
//! their input order so runs are deterministic and testable.
//!
//! A day with zero reviews never appears here; gap-filling is the rolling
//! window's job, the batcher only reflects observed data.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::Review;

/// Reviews observed on one calendar date
#[derive(Debug, Clone)]
pub struct DailyBatch {
    /// The calendar date
    pub date: NaiveDate,

    /// Reviews posted that day, in input order
    pub reviews: Vec<Review>,
}

/// Output of a batching pass
#[derive(Debug, Clone, Default)]
pub struct DailyBatches {
    /// Batches ordered ascending by date
    pub days: Vec<DailyBatch>,

    /// Reviews excluded for missing/unparseable timestamps
    pub skipped: u64,
}

impl DailyBatches {
    /// Total reviews retained across all days
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.days.iter().map(|d| d.reviews.len()).sum()
    }
}

/// Partition reviews into day-keyed batches.
///
/// Grouping is by the calendar date of `posted_at`; the BTreeMap keying
/// yields ascending date order, and per-day vectors preserve input order.
#[must_use]
pub fn batch(reviews: impl IntoIterator<Item = Review>) -> DailyBatches {
    let mut by_date: BTreeMap<NaiveDate, Vec<Review>> = BTreeMap::new();
    let mut skipped = 0u64;

    for review in reviews {
        match review.date() {
            Some(date) => by_date.entry(date).or_default().push(review),
            None => {
                tracing::debug!(review_id = %review.id, "skipping review without timestamp");
                skipped += 1;
            }
        }
    }

    DailyBatches {
        days: by_date
            .into_iter()
            .map(|(date, reviews)| DailyBatch { date, reviews })
            .collect(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn review(id: &str, day: u32) -> Review {
        Review {
            id: id.to_string(),
            posted_at: Some(Utc.with_ymd_and_hms(2026, 3, day, 9, 30, 0).unwrap()),
            rating: 2,
            text: format!("review {id}"),
        }
    }

    fn undated(id: &str) -> Review {
        Review {
            id: id.to_string(),
            posted_at: None,
            rating: 2,
            text: String::new(),
        }
    }

    #[test]
    fn test_groups_by_date_ascending() {
        let batches = batch(vec![review("c", 5), review("a", 2), review("b", 5)]);
        assert_eq!(batches.days.len(), 2);
        assert_eq!(batches.days[0].date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(batches.days[1].date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
        assert_eq!(batches.skipped, 0);
    }

    #[test]
    fn test_input_order_preserved_within_day() {
        let batches = batch(vec![review("x", 7), review("y", 7), review("z", 7)]);
        let ids: Vec<&str> = batches.days[0].reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_missing_timestamps_skipped_not_fatal() {
        let batches = batch(vec![undated("bad1"), review("ok", 3), undated("bad2")]);
        assert_eq!(batches.skipped, 2);
        assert_eq!(batches.review_count(), 1);
    }

    #[test]
    fn test_empty_input() {
        let batches = batch(Vec::new());
        assert!(batches.days.is_empty());
        assert_eq!(batches.skipped, 0);
    }
}
