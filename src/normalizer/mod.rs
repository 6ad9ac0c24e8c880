//! Topic normalization
//!
//! Canonicalizes raw topic strings produced by the classification capability
//! into stable topic keys: case-fold, whitespace/punctuation cleanup, then
//! alias collapsing against a configured synonym table. The normalizer holds
//! no topic knowledge of its own; the alias table is configuration data.
//!
//! `normalize` is deterministic and idempotent: feeding a canonical key back
//! in returns the same key.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::TopicKey;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Errors raised during topic normalization
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Input carries no usable text (empty or purely punctuation/control)
    #[error("Not a usable topic phrase: {raw:?}")]
    InvalidInput { raw: String },
}

/// Canonicalizes raw topic phrases into stable [`TopicKey`]s
#[derive(Debug, Clone, Default)]
pub struct TopicNormalizer {
    /// Canonical phrase -> canonical target key
    aliases: HashMap<String, String>,
}

impl TopicNormalizer {
    /// Build a normalizer from an alias table.
    ///
    /// Both sides of each entry are canonicalized, and chains are resolved
    /// (an alias pointing at another alias collapses to the final target),
    /// so that every produced key maps to itself on re-normalization.
    /// Entries whose key or value canonicalizes to nothing are dropped.
    #[must_use]
    pub fn new(aliases: &HashMap<String, String>) -> Self {
        let mut canonical: HashMap<String, String> = HashMap::new();
        for (raw_from, raw_to) in aliases {
            let (Some(from), Some(to)) = (canonicalize(raw_from), canonicalize(raw_to)) else {
                continue;
            };
            if from != to {
                canonical.insert(from, to);
            }
        }

        // Collapse chains; the hop bound guards against alias cycles.
        let mut resolved = HashMap::with_capacity(canonical.len());
        for (from, to) in &canonical {
            let mut target = to.clone();
            let mut hops = 0;
            while let Some(next) = canonical.get(&target) {
                if hops >= canonical.len() || next == from {
                    break;
                }
                target = next.clone();
                hops += 1;
            }
            resolved.insert(from.clone(), target);
        }

        // A cyclic table can leave a target that is still an alias key;
        // such entries would break idempotence, so they are dropped.
        let keys: std::collections::HashSet<String> = resolved.keys().cloned().collect();
        resolved.retain(|_, target| !keys.contains(target));

        Self { aliases: resolved }
    }

    /// Normalize a raw topic phrase into its canonical key.
    ///
    /// Unknown phrases normalize to a lowercase, trimmed,
    /// whitespace-collapsed form of themselves; nothing is silently dropped.
    ///
    /// # Errors
    /// [`NormalizeError::InvalidInput`] when the input has no alphanumeric
    /// content.
    pub fn normalize(&self, raw: &str) -> Result<TopicKey, NormalizeError> {
        let canonical = canonicalize(raw).ok_or_else(|| NormalizeError::InvalidInput {
            raw: raw.to_string(),
        })?;

        let key = self
            .aliases
            .get(&canonical)
            .cloned()
            .unwrap_or(canonical);

        Ok(TopicKey::new(key))
    }

    /// Number of alias entries after canonicalization
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

/// Cleanup pass shared by keys and alias table entries.
///
/// Lowercases, strips control and zero-width characters, trims edge
/// punctuation, and collapses whitespace runs. Returns `None` when nothing
/// alphanumeric survives.
fn canonicalize(raw: &str) -> Option<String> {
    let lowered: String = raw
        .chars()
        .filter(|c| !c.is_control() && !matches!(*c, '\u{200B}'..='\u{200F}' | '\u{FEFF}'))
        .flat_map(char::to_lowercase)
        .collect();

    let collapsed = WHITESPACE_REGEX.replace_all(&lowered, " ");
    let trimmed = collapsed
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '\'')
        .trim();

    if trimmed.chars().any(char::is_alphanumeric) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TopicNormalizer {
        let mut aliases = HashMap::new();
        aliases.insert("app crash".to_string(), "app crashing".to_string());
        aliases.insert("crashes".to_string(), "app crashing".to_string());
        aliases.insert("late delivery".to_string(), "delivery issue".to_string());
        TopicNormalizer::new(&aliases)
    }

    #[test]
    fn test_basic_cleanup() {
        let n = TopicNormalizer::default();
        let key = n.normalize("  App   Crashing!! ").unwrap();
        assert_eq!(key.as_str(), "app crashing");
    }

    #[test]
    fn test_alias_collapsing() {
        let n = normalizer();
        assert_eq!(n.normalize("App Crash").unwrap().as_str(), "app crashing");
        assert_eq!(n.normalize("CRASHES").unwrap().as_str(), "app crashing");
        // Unmapped phrases pass through in canonical form
        assert_eq!(n.normalize("Slow Loading").unwrap().as_str(), "slow loading");
    }

    #[test]
    fn test_idempotent() {
        let n = normalizer();
        for raw in ["App Crash", "crashes", "  Slow   Loading ", "payment;issue"] {
            let once = n.normalize(raw).unwrap();
            let twice = n.normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_alias_chain_resolved() {
        let mut aliases = HashMap::new();
        aliases.insert("crash".to_string(), "crashes".to_string());
        aliases.insert("crashes".to_string(), "app crashing".to_string());
        let n = TopicNormalizer::new(&aliases);
        assert_eq!(n.normalize("crash").unwrap().as_str(), "app crashing");
        assert_eq!(n.normalize("crashes").unwrap().as_str(), "app crashing");
    }

    #[test]
    fn test_rejects_non_text() {
        let n = TopicNormalizer::default();
        assert!(n.normalize("").is_err());
        assert!(n.normalize("   ").is_err());
        assert!(n.normalize("!!! ---").is_err());
    }
}
