//! Report pipeline driver
//!
//! Wires the batcher, extractor, rolling window, and scorer into one run:
//! raw reviews are partitioned into daily batches, each day's reviews are
//! classified concurrently (bounded fan-out), the merged snapshot is
//! inserted into the window, and the window is scored into a
//! [`TrendReport`].
//!
//! Days are processed strictly in ascending date order because the window
//! is write-once per date. A snapshot is only ever inserted after all of the
//! day's per-review extractions have been collected and merged, so
//! cancellation between days leaves a consistent, partially-filled window.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::batcher::{self, DailyBatch};
use crate::config::Config;
use crate::error::Result;
use crate::extractor::{KeywordClassifier, TopicClassifier, TopicExtractor};
use crate::models::{DailySnapshot, Review, RunSummary};
use crate::normalizer::TopicNormalizer;
use crate::report::TrendReport;
use crate::trends::TrendScorer;
use crate::window::RollingWindow;

/// One report run over a review stream.
///
/// Owns the single [`RollingWindow`] instance for the run; the window is
/// created empty here and discarded with the pipeline, so parallel runs for
/// different review streams never share state.
pub struct TrendPipeline {
    app_id: String,
    extractor: TopicExtractor,
    window: RollingWindow,
    scorer: TrendScorer,
    max_concurrency: usize,
    summary: RunSummary,
}

impl TrendPipeline {
    /// Build a pipeline around an externally supplied classifier
    #[must_use]
    pub fn new(config: &Config, classifier: Arc<dyn TopicClassifier>) -> Self {
        let normalizer = TopicNormalizer::new(&config.aliases);
        Self {
            app_id: config.app.id.clone(),
            extractor: TopicExtractor::new(classifier, normalizer, config.extraction.timeout()),
            window: RollingWindow::new(config.window.days),
            scorer: TrendScorer::new(
                config.scoring.change_threshold,
                config.scoring.min_topic_mentions,
            ),
            max_concurrency: config.extraction.max_concurrency,
            summary: RunSummary::default(),
        }
    }

    /// Build a pipeline with the bundled keyword classifier.
    ///
    /// # Errors
    /// `Error::Config` when a configured keyword pattern fails to compile.
    pub fn with_keyword_classifier(config: &Config) -> Result<Self> {
        let classifier = KeywordClassifier::new(&config.keywords)?;
        Ok(Self::new(config, Arc::new(classifier)))
    }

    /// Tally input records that were dropped before reaching the pipeline,
    /// so loader-level skips show up in the report summary
    pub fn record_malformed(&mut self, count: u64) {
        self.summary.reviews_malformed += count;
    }

    /// Process a review stream end to end and produce the trend report.
    ///
    /// Per-review failures (bad timestamps, classification errors) are
    /// absorbed and tallied in the report summary. A window ordering
    /// violation aborts the run, since it would mean the batcher's date ordering
    /// contract is broken and the trends could not be trusted.
    pub async fn run(mut self, reviews: Vec<Review>) -> Result<TrendReport> {
        let total = reviews.len() as u64;
        let batches = batcher::batch(reviews);
        self.summary.reviews_seen = total;
        self.summary.reviews_skipped = batches.skipped;

        tracing::info!(
            app_id = %self.app_id,
            days = batches.days.len(),
            reviews = batches.review_count(),
            skipped = batches.skipped,
            "processing review batches"
        );

        for day in batches.days {
            let snapshot = self.process_day(day).await;
            tracing::debug!(
                date = %snapshot.date,
                reviews = snapshot.review_count,
                topics = snapshot.topics.len(),
                "inserting daily snapshot"
            );
            self.window.insert(snapshot)?;
        }

        let records = self.scorer.score(&self.window)?;
        // score() already rejected an empty window
        let Some((window_start, window_end)) = self.window.span() else {
            return Err(crate::trends::TrendError::InsufficientData.into());
        };

        tracing::info!(
            topics = records.len(),
            window_days = self.window.len(),
            failures = self.summary.classification_failures.len(),
            "trend report ready"
        );

        Ok(TrendReport {
            app_id: self.app_id,
            generated_at: Utc::now(),
            window_start,
            window_end,
            records,
            snapshots: self.window.snapshots().cloned().collect(),
            summary: self.summary,
        })
    }

    /// Classify one day's reviews and merge the results into a snapshot.
    ///
    /// Extraction fans out up to `max_concurrency` concurrent classifier
    /// calls; `buffered` keeps completion order equal to input order so
    /// summaries and snapshots are deterministic. The snapshot is complete
    /// when this returns; partial snapshots are never observable.
    async fn process_day(&mut self, batch: DailyBatch) -> DailySnapshot {
        let extractor = &self.extractor;
        let extractions: Vec<_> = stream::iter(batch.reviews.iter())
            .map(|review| extractor.extract(review))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut snapshot = DailySnapshot::empty(batch.date);
        snapshot.review_count = batch.reviews.len() as u64;

        for extraction in extractions {
            if extraction.failed {
                self.summary
                    .classification_failures
                    .push(extraction.review_id);
                continue;
            }
            self.summary.invalid_topics += extraction.invalid_topics;
            for (topic, sentiment) in extraction.topics {
                snapshot
                    .topics
                    .entry(topic)
                    .or_default()
                    .record(&extraction.review_id, sentiment);
            }
        }

        snapshot
    }
}
