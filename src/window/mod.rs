//! Rolling window aggregator
//!
//! Maintains a fixed-span sliding collection of daily topic-count snapshots.
//! The window is append-only in time and write-once per date: inserts must
//! strictly advance the calendar, and skipped days are materialized as
//! explicit zero-count snapshots before the real one lands.
//!
//! Gap-filling is deliberate: the window always covers a true contiguous
//! calendar span, so trends stay comparable across topics with sporadic
//! mentions. Compacting away empty days would silently shrink the effective
//! window whenever review volume is sparse.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;

use crate::models::{DailySnapshot, TopicKey};

/// Default window span in calendar days
pub const DEFAULT_WINDOW_DAYS: usize = 30;

/// Errors raised by window operations
#[derive(Error, Debug)]
pub enum WindowError {
    /// Insert date does not strictly advance the window.
    ///
    /// The window is write-once per date; a duplicate or out-of-order insert
    /// means the driver's ordering contract is broken, so this is fatal.
    #[error("Insert for {attempted} does not advance window past {max}")]
    NonMonotonicInsert {
        attempted: NaiveDate,
        max: NaiveDate,
    },
}

/// Fill state of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowState {
    /// No snapshots held
    Empty,

    /// Between one snapshot and one short of capacity
    Filling,

    /// At capacity; each insert now evicts the oldest day
    Full,
}

/// One day of a topic's history, as returned by [`RollingWindow::query`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDay {
    pub date: NaiveDate,
    pub count: u64,
    pub sentiment_avg: f64,
}

/// Fixed-span sliding window of daily snapshots.
///
/// Owns its snapshots exclusively; eviction destroys the oldest day's data.
/// One instance exists per report run, created empty and discarded at run
/// end, with no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindow {
    capacity: usize,
    snapshots: VecDeque<DailySnapshot>,
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl RollingWindow {
    /// Create an empty window spanning up to `capacity` calendar days.
    ///
    /// A capacity below one day is clamped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            snapshots: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Insert the next day's snapshot.
    ///
    /// If `snapshot.date` is not the immediate next calendar day, explicit
    /// zero-count snapshots are synthesized for the skipped dates, but only
    /// the ones that fall inside the final span; a gap wider than the
    /// capacity never materializes the days it would immediately evict.
    /// The head is then evicted until the window is back within capacity.
    ///
    /// # Errors
    /// [`WindowError::NonMonotonicInsert`] when the date does not strictly
    /// exceed the window's current max date.
    pub fn insert(&mut self, snapshot: DailySnapshot) -> Result<(), WindowError> {
        if let Some(max) = self.max_date() {
            if snapshot.date <= max {
                return Err(WindowError::NonMonotonicInsert {
                    attempted: snapshot.date,
                    max,
                });
            }
            // Gap days that would be evicted right away are never
            // synthesized; a gap wider than the span just restarts it.
            let oldest_kept = snapshot.date - Duration::days(self.capacity as i64 - 1);
            if oldest_kept > max {
                self.snapshots.clear();
            }
            let mut gap = (max + Duration::days(1)).max(oldest_kept);
            while gap < snapshot.date {
                tracing::debug!(date = %gap, "filling window gap with empty snapshot");
                self.snapshots.push_back(DailySnapshot::empty(gap));
                gap = gap + Duration::days(1);
            }
        }

        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            let evicted = self.snapshots.pop_front();
            if let Some(old) = evicted {
                tracing::trace!(date = %old.date, "evicted oldest snapshot");
            }
        }

        Ok(())
    }

    /// Per-day history of a topic across the held span, ascending by date.
    ///
    /// Days where the topic is absent appear with a zero count.
    #[must_use]
    pub fn query(&self, topic: &TopicKey) -> Vec<TopicDay> {
        self.snapshots
            .iter()
            .map(|snap| {
                let (count, sentiment_avg) = snap
                    .topics
                    .get(topic)
                    .map_or((0, 0.0), |s| (s.count, s.sentiment_avg()));
                TopicDay {
                    date: snap.date,
                    count,
                    sentiment_avg,
                }
            })
            .collect()
    }

    /// Union of topic keys observed anywhere in the window
    #[must_use]
    pub fn topics(&self) -> BTreeSet<TopicKey> {
        self.snapshots
            .iter()
            .flat_map(|snap| snap.topics.keys().cloned())
            .collect()
    }

    /// Current fill state
    #[must_use]
    pub fn state(&self) -> WindowState {
        match self.snapshots.len() {
            0 => WindowState::Empty,
            n if n < self.capacity => WindowState::Filling,
            _ => WindowState::Full,
        }
    }

    /// Number of days currently held (including gap days)
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when no snapshots are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Configured span in days
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent date held, if any
    #[must_use]
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.snapshots.back().map(|s| s.date)
    }

    /// First and last dates held, if any
    #[must_use]
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.snapshots.front(), self.snapshots.back()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Snapshots in ascending date order
    pub fn snapshots(&self) -> impl Iterator<Item = &DailySnapshot> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TopicStats;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn snapshot(day: u32, topic: &str, count: u64) -> DailySnapshot {
        let mut snap = DailySnapshot::empty(date(day));
        let mut stats = TopicStats::default();
        for i in 0..count {
            stats.record(&format!("r{day}-{i}"), -0.5);
        }
        snap.topics.insert(TopicKey::new(topic), stats);
        snap.review_count = count;
        snap
    }

    #[test]
    fn test_state_transitions() {
        let mut window = RollingWindow::new(3);
        assert_eq!(window.state(), WindowState::Empty);

        window.insert(snapshot(1, "app crashing", 1)).unwrap();
        assert_eq!(window.state(), WindowState::Filling);

        window.insert(snapshot(2, "app crashing", 1)).unwrap();
        window.insert(snapshot(3, "app crashing", 1)).unwrap();
        assert_eq!(window.state(), WindowState::Full);

        // Full stays Full under steady eviction
        window.insert(snapshot(4, "app crashing", 1)).unwrap();
        assert_eq!(window.state(), WindowState::Full);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_gap_fill_materializes_empty_days() {
        let mut window = RollingWindow::new(30);
        window.insert(snapshot(1, "app crashing", 2)).unwrap();
        window.insert(snapshot(3, "app crashing", 4)).unwrap();

        assert_eq!(window.len(), 3);
        let history = window.query(&TopicKey::new("app crashing"));
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].date, date(2));
        assert_eq!(history[1].count, 0);
        assert_eq!(history[2].count, 4);
    }

    #[test]
    fn test_rejects_duplicate_and_out_of_order() {
        let mut window = RollingWindow::new(30);
        window.insert(snapshot(5, "slow loading", 1)).unwrap();

        let dup = window.insert(snapshot(5, "slow loading", 1));
        assert!(matches!(dup, Err(WindowError::NonMonotonicInsert { .. })));

        let backwards = window.insert(snapshot(4, "slow loading", 1));
        assert!(matches!(
            backwards,
            Err(WindowError::NonMonotonicInsert { .. })
        ));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_eviction_drops_oldest_date() {
        let mut window = RollingWindow::new(30);
        for day in 1..=31 {
            window.insert(snapshot(day, "payment issue", 1)).unwrap();
        }

        assert_eq!(window.len(), 30);
        let history = window.query(&TopicKey::new("payment issue"));
        assert_eq!(history.first().unwrap().date, date(2));
        assert_eq!(history.last().unwrap().date, date(31));
    }

    #[test]
    fn test_gap_larger_than_capacity_evicts_everything_real() {
        let mut window = RollingWindow::new(5);
        window.insert(snapshot(1, "app crashing", 3)).unwrap();
        window.insert(snapshot(20, "app crashing", 1)).unwrap();

        // The day-1 data and most gap days fell off the head
        assert_eq!(window.len(), 5);
        assert_eq!(window.span().unwrap(), (date(16), date(20)));
        let history = window.query(&TopicKey::new("app crashing"));
        assert_eq!(history.iter().map(|d| d.count).sum::<u64>(), 1);
    }

    #[test]
    fn test_multi_year_gap_keeps_window_bounded() {
        let mut window = RollingWindow::new(3);
        window.insert(snapshot(1, "app crashing", 2)).unwrap();

        let mut far = DailySnapshot::empty(NaiveDate::from_ymd_opt(2031, 6, 15).unwrap());
        far.review_count = 1;
        window.insert(far).unwrap();

        assert_eq!(window.len(), 3);
        assert_eq!(
            window.span().unwrap(),
            (
                NaiveDate::from_ymd_opt(2031, 6, 13).unwrap(),
                NaiveDate::from_ymd_opt(2031, 6, 15).unwrap()
            )
        );
        assert!(window.query(&TopicKey::new("app crashing")).iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_topics_union_and_query_sentiment() {
        let mut window = RollingWindow::new(30);
        window.insert(snapshot(1, "app crashing", 2)).unwrap();
        window.insert(snapshot(2, "slow loading", 1)).unwrap();

        let topics = window.topics();
        assert_eq!(topics.len(), 2);

        let history = window.query(&TopicKey::new("app crashing"));
        assert_eq!(history[0].sentiment_avg, -0.5);
        assert_eq!(history[1].sentiment_avg, 0.0);
    }
}
