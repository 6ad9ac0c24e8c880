//! Topic extraction adapter
//!
//! Wraps the external classification capability behind the
//! [`TopicClassifier`] trait, applies the normalizer, and returns
//! deduplicated per-review topic sets with sentiment tags.
//!
//! The capability is pluggable: anything from the bundled keyword matcher to
//! a learned classifier, as long as it honors the trait contract. Each call
//! runs under a caller-supplied timeout; a failure or timeout degrades to an
//! empty topic set for that review and is tallied, it never aborts a batch.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Review, TopicKey};
use crate::normalizer::TopicNormalizer;

pub mod keyword;

pub use keyword::KeywordClassifier;

/// Errors raised by the classification capability
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The capability did not answer within the configured timeout
    #[error("Classification timed out")]
    Timeout,

    /// The capability reported a failure
    #[error("Classification failed: {0}")]
    Failed(String),
}

/// A topic candidate as returned by the classification capability
#[derive(Debug, Clone)]
pub struct RawTopic {
    /// Raw topic phrase, not yet normalized
    pub label: String,

    /// Per-topic sentiment in [-1, 1], if the capability provides one
    pub sentiment: Option<f64>,
}

impl RawTopic {
    /// Convenience constructor for capabilities without sentiment output
    #[must_use]
    pub fn unscored(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sentiment: None,
        }
    }
}

/// The external classification capability.
///
/// Implementations map free review text to candidate topic phrases. The core
/// depends only on this contract, never on a specific implementation.
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// Extract candidate topics from review text
    async fn classify(&self, text: &str) -> Result<Vec<RawTopic>, ClassifyError>;
}

/// Result of extracting topics from a single review
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Id of the review this extraction belongs to
    pub review_id: String,

    /// Deduplicated (topic, sentiment) pairs; sentiment is in [-1, 1]
    pub topics: Vec<(TopicKey, f64)>,

    /// True if the capability failed or timed out for this review
    pub failed: bool,

    /// Raw labels dropped because they failed normalization
    pub invalid_topics: u64,
}

/// Adapter between the pipeline and the classification capability
pub struct TopicExtractor {
    classifier: Arc<dyn TopicClassifier>,
    normalizer: TopicNormalizer,
    timeout: Duration,
}

impl TopicExtractor {
    /// Create an adapter around a classification capability
    #[must_use]
    pub fn new(
        classifier: Arc<dyn TopicClassifier>,
        normalizer: TopicNormalizer,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            normalizer,
            timeout,
        }
    }

    /// Extract the normalized topic set for one review.
    ///
    /// Duplicate labels that normalize to the same key are counted once
    /// (first occurrence wins). Sentiment is clamped to [-1, 1]; when the
    /// capability omits it, the review's rating-derived sentiment is used.
    /// Capability failures and timeouts yield an empty set with `failed`
    /// set; the caller tallies them, processing continues.
    pub async fn extract(&self, review: &Review) -> Extraction {
        let raw = match tokio::time::timeout(self.timeout, self.classifier.classify(&review.text))
            .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                tracing::warn!(review_id = %review.id, error = %err, "classification failed");
                return Extraction {
                    review_id: review.id.clone(),
                    topics: Vec::new(),
                    failed: true,
                    invalid_topics: 0,
                };
            }
            Err(_elapsed) => {
                tracing::warn!(review_id = %review.id, "classification timed out");
                return Extraction {
                    review_id: review.id.clone(),
                    topics: Vec::new(),
                    failed: true,
                    invalid_topics: 0,
                };
            }
        };

        let fallback = review.rating_sentiment();
        let mut seen: HashSet<TopicKey> = HashSet::new();
        let mut topics = Vec::new();
        let mut invalid_topics = 0u64;

        for candidate in raw {
            let key = match self.normalizer.normalize(&candidate.label) {
                Ok(key) => key,
                Err(_) => {
                    invalid_topics += 1;
                    continue;
                }
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            let sentiment = candidate.sentiment.unwrap_or(fallback).clamp(-1.0, 1.0);
            topics.push((key, sentiment));
        }

        Extraction {
            review_id: review.id.clone(),
            topics,
            failed: false,
            invalid_topics,
        }
    }
}
