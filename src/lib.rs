//! trendigest - App review trend analyzer
//!
//! Ingests a stream of dated user reviews for a mobile application and
//! produces rolling trend reports describing recurring topics, issues, and
//! sentiment shifts over time.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`normalizer`] - Topic string canonicalization and alias collapsing
//! - [`batcher`] - Partitioning review streams into daily batches
//! - [`extractor`] - Classification capability trait and extraction adapter
//! - [`window`] - 30-day rolling window of daily topic snapshots
//! - [`trends`] - Trend scoring across the window
//! - [`pipeline`] - End-to-end report pipeline driver
//! - [`report`] - Format-agnostic trend report structure
//! - [`source`] - Review input collaborators (JSON loader, mock generator)
//!
//! # Example
//!
//! ```no_run
//! use trendigest::config::Config;
//! use trendigest::pipeline::TrendPipeline;
//! use trendigest::source::MockReviewSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::builtin();
//!     let start = chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
//!     let reviews = MockReviewSource::new(42).review_stream(start, 30, 20);
//!
//!     let pipeline = TrendPipeline::with_keyword_classifier(&config)?;
//!     let report = pipeline.run(reviews).await?;
//!     println!("{} topics tracked", report.topics_tracked());
//!     Ok(())
//! }
//! ```

pub mod batcher;
pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod trends;
pub mod window;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::extractor::{RawTopic, TopicClassifier, TopicExtractor};
    pub use crate::models::{DailySnapshot, Review, TopicKey, TrendDirection, TrendRecord};
    pub use crate::pipeline::TrendPipeline;
    pub use crate::report::TrendReport;
    pub use crate::window::{RollingWindow, WindowState};
}

// Direct re-exports for convenience
pub use models::{DailySnapshot, Review, TopicKey, TrendDirection, TrendRecord};
