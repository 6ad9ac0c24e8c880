//! Review input collaborators
//!
//! Review fetching is outside the core; this module supplies the two
//! bundled sources: a lenient JSON file loader and a deterministic mock
//! generator for demos and tests. Both emit plain [`Review`] records;
//! the pipeline does not care where reviews come from.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::models::Review;

/// Review record as it appears in input files
#[derive(Debug, Deserialize)]
struct RawReview {
    id: String,
    #[serde(default)]
    posted_at: Option<String>,
    rating: u8,
    text: String,
}

/// Result of loading a review file: the usable records plus a tally of
/// records that failed to deserialize.
#[derive(Debug)]
pub struct LoadedReviews {
    /// Records that deserialized cleanly
    pub reviews: Vec<Review>,
    /// Records dropped because they did not match the expected shape
    pub malformed: u64,
}

/// Load reviews from a JSON array file.
///
/// Recovery is record level: a record that fails to deserialize (missing
/// field, wrong type) is skipped and tallied in [`LoadedReviews::malformed`]
/// rather than failing the load. Only a file that is not a JSON array at
/// all is an error. Timestamps are parsed leniently: RFC 3339 first, then
/// a couple of plain formats; an unparseable or missing timestamp yields
/// `posted_at = None` (the batcher will skip and tally the record).
pub fn load_reviews(path: impl AsRef<Path>) -> Result<LoadedReviews> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

    let mut reviews = Vec::with_capacity(records.len());
    let mut malformed = 0u64;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<RawReview>(record) {
            Ok(r) => reviews.push(Review {
                posted_at: r.posted_at.as_deref().and_then(parse_timestamp),
                id: r.id,
                rating: r.rating.clamp(1, 5),
                text: r.text,
            }),
            Err(err) => {
                tracing::warn!(index, %err, "skipping malformed review record");
                malformed += 1;
            }
        }
    }

    Ok(LoadedReviews { reviews, malformed })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ts));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ts| Utc.from_utc_datetime(&ts));
    }
    None
}

/// Review templates: (text with one `{}` slot, filler choices, rating range)
const TEMPLATES: &[(&str, &[&str], (u8, u8))] = &[
    (
        "Delivery was {} late. Very disappointed!",
        &["1 hour", "2 hours", "30 minutes", "45 minutes"],
        (1, 2),
    ),
    (
        "Food arrived {}. Won't order again.",
        &["cold", "stale", "spoiled", "room temperature"],
        (1, 2),
    ),
    (
        "Delivery partner was {}.",
        &["rude", "impolite", "unprofessional"],
        (1, 2),
    ),
    (
        "App keeps crashing when I try to {}.",
        &["place order", "make payment", "track order"],
        (1, 2),
    ),
    (
        "Payment {} but money deducted.",
        &["failed", "showed error"],
        (1, 2),
    ),
    (
        "Received wrong order. {} instead.",
        &["veg burger", "chicken pizza", "wrong curry"],
        (1, 3),
    ),
    ("Order tracking not working properly.", &[""], (2, 3)),
    ("Some items were missing from my order.", &[""], (1, 3)),
    ("Great service! Food arrived hot and fresh.", &[""], (4, 5)),
    ("Quick delivery and polite delivery partner.", &[""], (4, 5)),
    ("App works perfectly. Very user friendly.", &[""], (4, 5)),
    (
        "Please add {}.",
        &["dark mode", "group ordering", "schedule delivery"],
        (3, 4),
    ),
    (
        "Need better {}.",
        &["customer support", "delivery tracking", "UI"],
        (2, 3),
    ),
];

/// Deterministic mock review generator.
///
/// Same seed, same reviews: keeps demo runs and tests reproducible.
#[derive(Debug)]
pub struct MockReviewSource {
    rng: ChaCha8Rng,
}

impl MockReviewSource {
    /// Create a generator from a seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate reviews for one calendar date
    pub fn daily_reviews(&mut self, date: NaiveDate, count: usize) -> Vec<Review> {
        (0..count)
            .filter_map(|i| self.review(date, i))
            .collect()
    }

    /// Generate reviews for `days` consecutive dates starting at `start`
    pub fn review_stream(&mut self, start: NaiveDate, days: usize, per_day: usize) -> Vec<Review> {
        let mut reviews = Vec::with_capacity(days * per_day);
        for offset in 0..days {
            let date = start + chrono::Duration::days(offset as i64);
            // Volume wobbles day to day
            let count = self.rng.gen_range(per_day.saturating_sub(per_day / 3)..=per_day);
            reviews.extend(self.daily_reviews(date, count));
        }
        reviews
    }

    fn review(&mut self, date: NaiveDate, index: usize) -> Option<Review> {
        let (template, fillers, (lo, hi)) = TEMPLATES.choose(&mut self.rng)?;
        let filler = fillers.choose(&mut self.rng)?;
        let text = template.replace("{}", *filler);
        let rating = self.rng.gen_range(*lo..=*hi);
        let posted = date.and_hms_opt(
            self.rng.gen_range(0..24),
            self.rng.gen_range(0..60),
            0,
        )?;

        Some(Review {
            id: format!("mock-{date}-{index}"),
            posted_at: Some(Utc.from_utc_datetime(&posted)),
            rating,
            text,
        })
    }
}
