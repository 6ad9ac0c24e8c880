//! Keyword-based topic classifier
//!
//! The bundled implementation of the classification capability: a table of
//! topic labels, each with a list of case-insensitive regex patterns. A
//! review text yields a topic when any of its patterns match. The table is
//! configuration data (`[keywords]` in the TOML config); the classifier
//! contains no topic knowledge of its own.
//!
//! Emits no per-topic sentiment; the extractor adapter falls back to the
//! review's rating-derived sentiment.

use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;

use super::{ClassifyError, RawTopic, TopicClassifier};
use crate::error::{Error, Result};

/// One topic's compiled match rules
#[derive(Debug)]
struct TopicRule {
    label: String,
    patterns: Vec<Regex>,
}

/// Regex keyword matcher implementing [`TopicClassifier`]
#[derive(Debug)]
pub struct KeywordClassifier {
    rules: Vec<TopicRule>,
}

impl KeywordClassifier {
    /// Compile a pattern table into a classifier.
    ///
    /// The BTreeMap keying fixes rule order, so classification output order
    /// is deterministic across runs.
    ///
    /// # Errors
    /// `Error::Config` when a pattern fails to compile.
    pub fn new(table: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut rules = Vec::with_capacity(table.len());
        for (label, patterns) in table {
            let mut compiled = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
                    Error::config(format!("bad keyword pattern {pattern:?} for {label:?}: {e}"))
                })?;
                compiled.push(regex);
            }
            rules.push(TopicRule {
                label: label.clone(),
                patterns: compiled,
            });
        }
        Ok(Self { rules })
    }

    /// Number of topics in the table
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.rules.len()
    }
}

#[async_trait]
impl TopicClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> std::result::Result<Vec<RawTopic>, ClassifyError> {
        let mut topics = Vec::new();
        for rule in &self.rules {
            // First matching pattern wins; remaining patterns for the same
            // topic are skipped.
            if rule.patterns.iter().any(|p| p.is_match(text)) {
                topics.push(RawTopic::unscored(&rule.label));
            }
        }
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_keyword_table;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(&default_keyword_table()).unwrap()
    }

    #[tokio::test]
    async fn test_matches_default_patterns() {
        let c = classifier();
        let topics = c
            .classify("App keeps crashing when I try to place order.")
            .await
            .unwrap();
        let labels: Vec<&str> = topics.iter().map(|t| t.label.as_str()).collect();
        assert!(labels.contains(&"App crashing"));
    }

    #[tokio::test]
    async fn test_one_topic_per_review_regardless_of_pattern_count() {
        let c = classifier();
        // Hits several "App crashing" patterns at once
        let topics = c.classify("app crash, it hangs and freeze").await.unwrap();
        let crashes = topics.iter().filter(|t| t.label == "App crashing").count();
        assert_eq!(crashes, 1);
    }

    #[tokio::test]
    async fn test_no_match_yields_empty_set() {
        let c = classifier();
        let topics = c.classify("Great service, food arrived hot!").await.unwrap();
        assert!(topics.is_empty());
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let mut table = BTreeMap::new();
        table.insert("broken".to_string(), vec!["([unclosed".to_string()]);
        assert!(KeywordClassifier::new(&table).is_err());
    }
}
