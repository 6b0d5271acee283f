//! Analyzer configuration.
//!
//! Every field has a default, so an empty JSON object is a valid configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for extraction, matching and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Characters of input text echoed in the report
    pub raw_text_preview_chars: usize,
    /// Candidates whose base similarity falls below this are discarded
    pub min_base_similarity: f64,
    /// Weight applied to generic-name similarity relative to brand similarity
    pub generic_discount: f64,
    /// Shortest detected text (trimmed) accepted at the FFI boundary
    pub min_detected_text_chars: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            raw_text_preview_chars: 500,
            min_base_similarity: 0.3,
            generic_discount: 0.9,
            min_detected_text_chars: 10,
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("parsing analyzer config {}", path.display()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.raw_text_preview_chars == 0 {
            return Err(ConfigError::Invalid(
                "raw_text_preview_chars must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_base_similarity) {
            return Err(ConfigError::Invalid(format!(
                "min_base_similarity must be within [0, 1], got {}",
                self.min_base_similarity
            )));
        }
        if !(self.generic_discount > 0.0 && self.generic_discount <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "generic_discount must be within (0, 1], got {}",
                self.generic_discount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.raw_text_preview_chars, 500);
        assert_eq!(config.min_base_similarity, 0.3);
        assert_eq!(config.generic_discount, 0.9);
        assert_eq!(config.min_detected_text_chars, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalyzerConfig::from_json_str(r#"{"min_base_similarity": 0.5}"#).unwrap();
        assert_eq!(config.min_base_similarity, 0.5);
        assert_eq!(config.raw_text_preview_chars, 500);

        let empty = AnalyzerConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, AnalyzerConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AnalyzerConfig::from_json_str(r#"{"generic_discount": 0.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_json_str(r#"{"min_base_similarity": 1.5}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_json_str(r#"{"raw_text_preview_chars": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"raw_text_preview_chars": 120}}"#).unwrap();

        let config = AnalyzerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.raw_text_preview_chars, 120);

        assert!(AnalyzerConfig::from_file("/nonexistent/rx-scan.json").is_err());
    }
}
