//! Shared fixtures for integration tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

use trendigest::config::Config;
use trendigest::extractor::{ClassifyError, RawTopic, TopicClassifier};
use trendigest::models::Review;

/// A review posted on the given day of March 2026
pub fn review(id: &str, day: u32, rating: u8, text: &str) -> Review {
    Review {
        id: id.to_string(),
        posted_at: Some(Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()),
        rating,
        text: text.to_string(),
    }
}

/// Builtin config with the alias table cleared, so stub classifier labels
/// pass through the normalizer unchanged (modulo canonical cleanup).
pub fn plain_config() -> Config {
    let mut config = Config::builtin();
    config.aliases.clear();
    config
}

/// Classifier that splits review text on ';' and returns each piece as a
/// topic label. Review text doubles as the topic list in these tests.
pub struct SplitClassifier;

#[async_trait]
impl TopicClassifier for SplitClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<RawTopic>, ClassifyError> {
        Ok(text
            .split(';')
            .filter(|t| !t.trim().is_empty())
            .map(RawTopic::unscored)
            .collect())
    }
}

/// Classifier that fails for any review text containing "FAIL"
pub struct FlakyClassifier;

#[async_trait]
impl TopicClassifier for FlakyClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<RawTopic>, ClassifyError> {
        if text.contains("FAIL") {
            return Err(ClassifyError::Failed("simulated outage".to_string()));
        }
        SplitClassifier.classify(text).await
    }
}

/// Arc-wrapped stub classifiers
pub fn split_classifier() -> Arc<dyn TopicClassifier> {
    Arc::new(SplitClassifier)
}

pub fn flaky_classifier() -> Arc<dyn TopicClassifier> {
    Arc::new(FlakyClassifier)
}
