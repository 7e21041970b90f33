//! Configuration for the annotation stage
//!
//! Sensible defaults, environment overrides in production. All variables
//! are prefixed `CONCEPT_MAP_`.

use std::env;

/// Configuration for the rule-based annotator
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    /// Minimum token length considered for a concept span
    pub min_token_len: usize,

    /// Maximum accepted input size in bytes (0 = unlimited).
    /// Oversized input is an extraction error, not a truncation.
    pub max_text_len: usize,

    /// Extra stop words merged into the built-in set
    pub extra_stop_words: Vec<String>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            max_text_len: 1_048_576,
            extra_stop_words: Vec::new(),
        }
    }
}

impl AnnotatorConfig {
    /// Load from environment variables, falling back to defaults
    ///
    /// - `CONCEPT_MAP_MIN_TOKEN_LEN`: minimum token length (default 2)
    /// - `CONCEPT_MAP_MAX_TEXT_LEN`: max input bytes, 0 = unlimited (default 1 MiB)
    /// - `CONCEPT_MAP_STOP_WORDS`: comma-separated extra stop words
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("CONCEPT_MAP_MIN_TOKEN_LEN") {
            match val.parse() {
                Ok(n) => config.min_token_len = n,
                Err(_) => {
                    tracing::warn!("Invalid CONCEPT_MAP_MIN_TOKEN_LEN '{}' - using default", val)
                }
            }
        }

        if let Ok(val) = env::var("CONCEPT_MAP_MAX_TEXT_LEN") {
            match val.parse() {
                Ok(n) => config.max_text_len = n,
                Err(_) => {
                    tracing::warn!("Invalid CONCEPT_MAP_MAX_TEXT_LEN '{}' - using default", val)
                }
            }
        }

        if let Ok(words) = env::var("CONCEPT_MAP_STOP_WORDS") {
            config.extra_stop_words = words
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.min_token_len, 2);
        assert_eq!(config.max_text_len, 1_048_576);
        assert!(config.extra_stop_words.is_empty());
    }
}
