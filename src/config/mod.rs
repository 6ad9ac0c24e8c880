//! Configuration management
//!
//! Loads and validates configuration from defaults, a TOML file, and
//! `TRENDIGEST_*` environment variables. The alias table and keyword
//! pattern table are configuration data here, never hardcoded in the
//! normalizer or classifier.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application under analysis
    pub app: AppConfig,

    /// Rolling window configuration
    pub window: WindowConfig,

    /// Trend scoring configuration
    pub scoring: ScoringConfig,

    /// Topic extraction configuration
    pub extraction: ExtractionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Topic alias table: raw phrase -> canonical topic
    pub aliases: HashMap<String, String>,

    /// Keyword classifier table: topic label -> regex patterns
    pub keywords: BTreeMap<String, Vec<String>>,
}

/// Application under analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Store identifier of the app
    pub id: String,

    /// Store country code
    pub country: String,

    /// Review language
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            id: "in.swiggy.android".to_string(),
            country: "in".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Rolling window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window span in calendar days
    pub days: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            days: crate::window::DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Trend scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Relative change needed to call a topic rising or falling
    pub change_threshold: f64,

    /// Minimum total window mentions for a topic to appear in reports
    pub min_topic_mentions: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            change_threshold: crate::trends::DEFAULT_CHANGE_THRESHOLD,
            min_topic_mentions: 1,
        }
    }
}

/// Topic extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Per-review classification timeout in milliseconds
    pub timeout_ms: u64,

    /// Concurrent classification calls within one day's batch
    pub max_concurrency: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_concurrency: 8,
        }
    }
}

impl ExtractionConfig {
    /// Timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Built-in defaults with the stock alias and keyword tables
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            aliases: default_aliases(),
            keywords: default_keyword_table(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::builtin();

        if let Ok(id) = std::env::var("TRENDIGEST_APP_ID") {
            config.app.id = id;
        }
        if let Some(days) = env_parse::<usize>("TRENDIGEST_WINDOW_DAYS")? {
            config.window.days = days;
        }
        if let Some(threshold) = env_parse::<f64>("TRENDIGEST_CHANGE_THRESHOLD")? {
            config.scoring.change_threshold = threshold;
        }
        if let Some(min) = env_parse::<u64>("TRENDIGEST_MIN_TOPIC_MENTIONS")? {
            config.scoring.min_topic_mentions = min;
        }
        if let Some(timeout) = env_parse::<u64>("TRENDIGEST_CLASSIFY_TIMEOUT_MS")? {
            config.extraction.timeout_ms = timeout;
        }
        if let Some(concurrency) = env_parse::<usize>("TRENDIGEST_MAX_CONCURRENCY")? {
            config.extraction.max_concurrency = concurrency;
        }
        if let Ok(level) = std::env::var("TRENDIGEST_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// Sections absent from the file keep their defaults; an empty
    /// `[aliases]` or `[keywords]` table in the file disables the stock one.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let file: FileConfig = toml::from_str(&raw)?;

        let config = Self {
            app: file.app,
            window: file.window,
            scoring: file.scoring,
            extraction: file.extraction,
            logging: file.logging,
            aliases: file.aliases.unwrap_or_else(default_aliases),
            keywords: file.keywords.unwrap_or_else(default_keyword_table),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.window.days == 0 {
            return Err(Error::config("window.days must be at least 1"));
        }
        if !(0.0..=10.0).contains(&self.scoring.change_threshold) {
            return Err(Error::config("scoring.change_threshold out of range"));
        }
        if self.extraction.timeout_ms == 0 {
            return Err(Error::config("extraction.timeout_ms must be positive"));
        }
        if self.extraction.max_concurrency == 0 {
            return Err(Error::config("extraction.max_concurrency must be at least 1"));
        }
        Ok(())
    }
}

/// File shape for [`Config::from_file`].
///
/// The tables are `Option` so an absent table (default substituted) is
/// distinguishable from an explicitly empty one (stock table disabled).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    app: AppConfig,
    window: WindowConfig,
    scoring: ScoringConfig,
    extraction: ExtractionConfig,
    logging: LoggingConfig,
    aliases: Option<HashMap<String, String>>,
    keywords: Option<BTreeMap<String, Vec<String>>>,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::config(format!("{name} has invalid value {raw:?}"))),
        Err(_) => Ok(None),
    }
}

/// Stock alias table mapping common raw phrasings onto canonical topics.
///
/// Keys and values are canonicalized again by the normalizer, so casing
/// here is cosmetic.
#[must_use]
pub fn default_aliases() -> HashMap<String, String> {
    [
        ("crashes", "app crashing"),
        ("app crash", "app crashing"),
        ("crashing", "app crashing"),
        ("app freezes", "app crashing"),
        ("late delivery", "delivery issue"),
        ("delivery late", "delivery issue"),
        ("delivery delayed", "delivery issue"),
        ("slow delivery", "long delivery time"),
        ("cold food", "food stale"),
        ("stale food", "food stale"),
        ("refund", "payment issue"),
        ("refund problem", "payment issue"),
        ("payment failed", "payment issue"),
        ("rude delivery partner", "delivery partner rude"),
        ("bad support", "customer support unresponsive"),
        ("no response from support", "customer support unresponsive"),
        ("wrong item", "wrong order delivered"),
        ("incorrect order", "wrong order delivered"),
        ("order cancelled", "order cancellation"),
        ("bad food", "food quality poor"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Stock keyword pattern table for the bundled classifier
#[must_use]
pub fn default_keyword_table() -> BTreeMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        (
            "Delivery issue",
            &[
                r"delivery.*late",
                r"delivery.*delay",
                r"late.*delivery",
                r"delayed",
                r"not.*delivered",
                r"missed.*delivery",
            ],
        ),
        (
            "Food stale",
            &[
                r"food.*cold",
                r"cold.*food",
                r"stale",
                r"not.*fresh",
                r"spoiled",
                r"bad.*food",
            ],
        ),
        (
            "Delivery partner rude",
            &[
                r"rude",
                r"impolite",
                r"bad.*behavior",
                r"unprofessional",
                r"argu",
                r"disrespect",
            ],
        ),
        (
            "App crashing",
            &[
                r"app.*crash",
                r"crash.*app",
                r"freeze",
                r"not.*respond",
                r"hangs",
                r"bug.*app",
            ],
        ),
        (
            "Payment issue",
            &[
                r"payment.*fail",
                r"fail.*payment",
                r"transaction.*fail",
                r"money.*deducted",
                r"refund",
                r"payment.*problem",
            ],
        ),
        (
            "Order cancellation",
            &[
                r"order.*cancel",
                r"cancel.*order",
                r"cancelled",
                r"order.*not.*placed",
                r"auto.*cancel",
            ],
        ),
        (
            "Food quality poor",
            &[
                r"quality.*poor",
                r"bad.*quality",
                r"taste.*bad",
                r"worst.*food",
                r"tasteless",
            ],
        ),
        (
            "Wrong order delivered",
            &[
                r"wrong.*order",
                r"incorrect.*order",
                r"not.*what.*ordered",
                r"mistake.*order",
                r"wrong.*item",
            ],
        ),
        (
            "Long delivery time",
            &[
                r"long.*time",
                r"takes.*hours",
                r"slow.*delivery",
                r"waiting.*long",
                r"delivery.*slow",
            ],
        ),
        (
            "Customer support unresponsive",
            &[
                r"support",
                r"customer.*service",
                r"no.*response",
                r"assistance",
            ],
        ),
    ];

    table
        .iter()
        .map(|(label, patterns)| {
            (
                (*label).to_string(),
                patterns.iter().map(|p| (*p).to_string()).collect(),
            )
        })
        .collect()
}
