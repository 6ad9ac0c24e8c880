//! Unified error handling for the trendigest crate
//!
//! Each component defines its own `thiserror` enum next to the code that
//! raises it; this module wraps them into a single [`Error`] for use across
//! module boundaries, together with an [`ErrorCategory`] classification that
//! drives the propagation policy:
//!
//! - record-level errors (bad review text, classification failures) are
//!   absorbed and tallied in the run summary, never fatal;
//! - window-integrity violations are fatal; continuing after one would
//!   produce silently wrong trends.

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::extractor::ClassifyError;
pub use crate::normalizer::NormalizeError;
pub use crate::trends::TrendError;
pub use crate::window::WindowError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed input records or topic text
    Input,
    /// Classification capability failures and timeouts
    Classification,
    /// Rolling-window ordering/integrity violations
    Window,
    /// Scoring preconditions not met
    Scoring,
    /// Configuration and validation errors
    Config,
    /// Storage and I/O errors
    Storage,
    /// Other/unknown errors
    Other,
}

/// Unified error type for the trendigest crate
#[derive(Error, Debug)]
pub enum Error {
    /// Topic normalization errors
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Classification capability errors
    #[error("Classify error: {0}")]
    Classify(#[from] ClassifyError),

    /// Rolling window integrity errors
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Trend scoring errors
    #[error("Trend error: {0}")]
    Trend(#[from] TrendError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Check if this error may be absorbed at the record level.
    ///
    /// Recoverable errors are tallied into the run summary and processing
    /// continues; non-recoverable ones abort the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Normalize(_) | Self::Classify(_) => true,
            Self::Window(_) | Self::Trend(_) => false,
            // Nothing retries I/O; a failed read or write aborts the run
            Self::Io(_) | Self::Json(_) | Self::Toml(_) | Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    /// Get the error category for handling strategies
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Normalize(_) => ErrorCategory::Input,
            Self::Classify(_) => ErrorCategory::Classification,
            Self::Window(_) => ErrorCategory::Window,
            Self::Trend(_) => ErrorCategory::Scoring,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Input,
            Self::Toml(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
