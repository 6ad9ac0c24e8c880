//! Trend scoring
//!
//! Compares the current window's per-topic statistics against a prior
//! sub-window and classifies each topic as new / rising / falling / stable /
//! resolved, ranked by magnitude of change.
//!
//! The window of n days splits into two contiguous halves: "recent" = last
//! ceil(n/2) days, "prior" = the remainder. At a full 30-day window that is
//! a fixed 15/15 split; while the window is still filling the halves scale
//! proportionally.

use thiserror::Error;

use crate::models::{TopicKey, TrendDirection, TrendRecord};
use crate::window::RollingWindow;

/// Relative-change threshold for the rising/falling classification
pub const DEFAULT_CHANGE_THRESHOLD: f64 = 0.25;

/// Errors raised during trend scoring
#[derive(Error, Debug)]
pub enum TrendError {
    /// The window holds no days; callers must accumulate at least one day
    #[error("Window is empty; no days to score")]
    InsufficientData,
}

/// Classify direction from sub-window counts.
///
/// Rules evaluated in order:
/// 1. previous == 0 and current > 0 -> New
/// 2. current == 0 and previous > 0 -> Resolved
/// 3. delta > 0 and delta / max(previous, 1) >= threshold -> Rising
/// 4. delta < 0 and |delta| / max(previous, 1) >= threshold -> Falling
/// 5. otherwise -> Stable
#[must_use]
pub fn classify_direction(previous: u64, current: u64, threshold: f64) -> TrendDirection {
    if previous == 0 && current > 0 {
        return TrendDirection::New;
    }
    if current == 0 && previous > 0 {
        return TrendDirection::Resolved;
    }

    let delta = current as i64 - previous as i64;
    let base = previous.max(1) as f64;
    if delta > 0 && delta as f64 / base >= threshold {
        TrendDirection::Rising
    } else if delta < 0 && delta.unsigned_abs() as f64 / base >= threshold {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    }
}

/// Scores topic trends over a rolling window
#[derive(Debug, Clone)]
pub struct TrendScorer {
    /// Relative change needed to call a topic rising or falling
    change_threshold: f64,

    /// Topics with fewer total window mentions are omitted from the report
    min_topic_mentions: u64,
}

impl Default for TrendScorer {
    fn default() -> Self {
        Self {
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
            min_topic_mentions: 1,
        }
    }
}

impl TrendScorer {
    /// Create a scorer with explicit thresholds
    #[must_use]
    pub fn new(change_threshold: f64, min_topic_mentions: u64) -> Self {
        Self {
            change_threshold,
            min_topic_mentions: min_topic_mentions.max(1),
        }
    }

    /// Score every topic observed anywhere in the window.
    ///
    /// Output is ordered by descending absolute delta, ties broken
    /// alphabetically by topic key, so reports are deterministic.
    ///
    /// # Errors
    /// [`TrendError::InsufficientData`] when the window is empty.
    pub fn score(&self, window: &RollingWindow) -> Result<Vec<TrendRecord>, TrendError> {
        if window.is_empty() {
            return Err(TrendError::InsufficientData);
        }

        let n = window.len();
        let recent_len = n.div_ceil(2);
        let prior_len = n - recent_len;

        let mut records: Vec<TrendRecord> = window
            .topics()
            .into_iter()
            .filter_map(|topic| self.score_topic(window, &topic, prior_len))
            .collect();

        records.sort_by(|a, b| {
            b.delta
                .abs()
                .cmp(&a.delta.abs())
                .then_with(|| a.topic.cmp(&b.topic))
        });

        Ok(records)
    }

    fn score_topic(
        &self,
        window: &RollingWindow,
        topic: &TopicKey,
        prior_len: usize,
    ) -> Option<TrendRecord> {
        let mut previous_count = 0u64;
        let mut current_count = 0u64;
        let mut sentiment_sum = 0.0f64;

        for (idx, snap) in window.snapshots().enumerate() {
            let Some(stats) = snap.topics.get(topic) else {
                continue;
            };
            if idx < prior_len {
                previous_count += stats.count;
            } else {
                current_count += stats.count;
            }
            sentiment_sum += stats.sentiment_sum;
        }

        let total = previous_count + current_count;
        if total < self.min_topic_mentions {
            return None;
        }

        let avg_sentiment = if total == 0 {
            0.0
        } else {
            sentiment_sum / total as f64
        };

        Some(TrendRecord {
            topic: topic.clone(),
            delta: current_count as i64 - previous_count as i64,
            direction: classify_direction(previous_count, current_count, self.change_threshold),
            current_count,
            previous_count,
            avg_sentiment,
        })
    }
}
