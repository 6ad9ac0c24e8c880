// Core data structures for the trendigest pipeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A single user review as delivered by the input collaborator.
///
/// Immutable once ingested: the pipeline reads reviews, it never mutates
/// them. `posted_at` is `None` when the loader could not parse a timestamp;
/// such records are excluded by the batcher and tallied in the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Opaque unique identifier assigned by the review source
    pub id: String,

    /// When the review was posted (UTC); `None` if unparseable
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,

    /// Star rating, 1-5
    pub rating: u8,

    /// Free-text review body
    pub text: String,
}

impl Review {
    /// Calendar date of the review, if it has a usable timestamp
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.posted_at.map(|ts| ts.date_naive())
    }

    /// Map the 1-5 star rating onto a sentiment value in [-1, 1]
    ///
    /// Used as the fallback when the classification capability returns a
    /// topic without its own sentiment.
    #[must_use]
    pub fn rating_sentiment(&self) -> f64 {
        ((f64::from(self.rating) - 3.0) / 2.0).clamp(-1.0, 1.0)
    }
}

/// Canonical identifier for a normalized topic.
///
/// Two raw phrases that normalize to the same key are the same topic for all
/// aggregation purposes; equality is exact string equality on the canonical
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicKey(String);

impl TopicKey {
    /// Wrap an already-canonical string.
    ///
    /// Only the normalizer should construct keys from raw input; this is for
    /// canonical strings (alias table values, test fixtures).
    #[must_use]
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    /// The canonical string form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TopicKey> for String {
    fn from(key: TopicKey) -> Self {
        key.0
    }
}

/// Per-topic accumulation within a single day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicStats {
    /// Number of distinct reviews mentioning the topic this day
    pub count: u64,

    /// Sum of sentiment values over those reviews
    pub sentiment_sum: f64,

    /// Ids of the contributing reviews (one entry per review per topic)
    pub review_ids: HashSet<String>,
}

impl TopicStats {
    /// Record one review's mention of the topic.
    ///
    /// Returns false (and changes nothing) if the review already contributed
    /// to this topic, so a review never double-counts a single topic.
    pub fn record(&mut self, review_id: &str, sentiment: f64) -> bool {
        if !self.review_ids.insert(review_id.to_string()) {
            return false;
        }
        self.count += 1;
        self.sentiment_sum += sentiment;
        true
    }

    /// Mean sentiment for the day, 0.0 when the topic has no reviews
    #[must_use]
    pub fn sentiment_avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sentiment_sum / self.count as f64
        }
    }
}

/// One day's aggregated topic counts.
///
/// Created once per day by the batcher + extractor pipeline, immutable after
/// creation, and owned exclusively by the rolling window thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Calendar date this snapshot covers
    pub date: NaiveDate,

    /// Topic statistics, keyed by canonical topic
    pub topics: BTreeMap<TopicKey, TopicStats>,

    /// Total reviews observed for the day, including zero-topic reviews
    pub review_count: u64,
}

impl DailySnapshot {
    /// Create an empty snapshot for a date (used for gap days)
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            topics: BTreeMap::new(),
            review_count: 0,
        }
    }

    /// True if no reviews contributed to this day
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.review_count == 0
    }

    /// Count for a topic on this day, 0 if absent
    #[must_use]
    pub fn count(&self, topic: &TopicKey) -> u64 {
        self.topics.get(topic).map_or(0, |s| s.count)
    }
}

/// Direction of a topic's movement between the prior and recent sub-windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    /// Absent from the prior sub-window, present in the recent one
    New,

    /// Count grew by at least the relative-change threshold
    Rising,

    /// Count shrank by at least the relative-change threshold
    Falling,

    /// No significant change
    Stable,

    /// Present in the prior sub-window, absent from the recent one
    Resolved,
}

impl TrendDirection {
    /// String form used in rendered reports
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Rising => "RISING",
            Self::Falling => "FALLING",
            Self::Stable => "STABLE",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored trend for one topic across the current window.
///
/// Derived data: fully recomputed on every report generation, never
/// persisted as authoritative state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Canonical topic
    pub topic: TopicKey,

    /// Mention count in the recent sub-window
    pub current_count: u64,

    /// Mention count in the prior sub-window
    pub previous_count: u64,

    /// current_count - previous_count
    pub delta: i64,

    /// Classified direction of movement
    pub direction: TrendDirection,

    /// Mean sentiment across the whole window, 0.0 with no reviews
    pub avg_sentiment: f64,
}

/// Failure and skip tallies for one pipeline run.
///
/// Always attached to the final report so data loss is never silent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total reviews handed to the pipeline
    pub reviews_seen: u64,

    /// Reviews excluded for missing/unparseable timestamps
    pub reviews_skipped: u64,

    /// Input records dropped because they failed to deserialize at all
    pub reviews_malformed: u64,

    /// Ids of reviews whose classification failed or timed out
    pub classification_failures: Vec<String>,

    /// Raw topic labels dropped because they failed normalization
    pub invalid_topics: u64,
}

impl RunSummary {
    /// True if every review made it through cleanly
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.reviews_skipped == 0
            && self.reviews_malformed == 0
            && self.classification_failures.is_empty()
            && self.invalid_topics == 0
    }
}
