//! Configuration types for the cleaning pipeline.
//!
//! Defaults reproduce the cleaner's fixed contract: the sentinel list, the
//! strict 60% numeric threshold, the five-value date sample and the keyword
//! lists that drive the name-keyed rules. Downstream aggregators depend on
//! these values, so changing them is a breaking change for cleaned output.

use crate::error::{CleaningError, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tokens replaced by null before type inference.
pub const DEFAULT_SENTINEL_TOKENS: [&str; 7] = ["", " ", "NA", "N/A", "--", "null", "None"];

/// Column-name keywords that mark a date column.
pub const DEFAULT_DATE_KEYWORDS: [&str; 1] = ["date"];

/// Column-name keywords that mark a money-like column.
pub const DEFAULT_MONEY_KEYWORDS: [&str; 7] = [
    "salary", "revenue", "cost", "amount", "sales", "price", "total",
];

/// Column-name keywords that mark a percentage column.
pub const DEFAULT_PERCENT_KEYWORDS: [&str; 3] = ["%", "percent", "pct"];

/// Text values treated as missing by the mode imputer.
pub const DEFAULT_TEXT_NULL_TOKENS: [&str; 3] = ["", "nan", "None"];

/// Policy for headers that normalize to an already-used name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionPolicy {
    /// Append `_2`, `_3`, ... to later occurrences
    #[default]
    Suffix,
    /// Fail the table
    Reject,
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleanerConfig::builder()`] to create a configuration with the fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::config::{CleanerConfig, CollisionPolicy};
///
/// let config = CleanerConfig::builder()
///     .numeric_threshold(0.6)
///     .column_collision(CollisionPolicy::Reject)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Exact cell values replaced by null before inference.
    pub sentinel_tokens: Vec<String>,

    /// Share of numeric-like values (over all rows, nulls included) a column
    /// must strictly exceed to be classified numeric.
    /// Default: 0.6
    pub numeric_threshold: f64,

    /// Number of leading non-null values sniffed for date classification.
    /// Default: 5
    pub date_sample_size: usize,

    /// Column-name substrings that trigger the date rule.
    pub date_keywords: Vec<String>,

    /// Column-name substrings that trigger the money rule.
    pub money_keywords: Vec<String>,

    /// Column-name substrings that trigger the percent rule.
    pub percent_keywords: Vec<String>,

    /// Text values the mode imputer treats as missing.
    pub text_null_tokens: Vec<String>,

    /// Whether to remove duplicate rows (before and after the typed stages).
    /// Default: true
    pub remove_duplicates: bool,

    /// What to do when two headers normalize to the same name.
    /// Default: Suffix
    pub column_collision: CollisionPolicy,

    /// Prefix for cleaned output file names.
    /// Default: "cleaned_"
    pub output_prefix: String,

    /// Extension of input files picked up by the batch driver.
    /// Default: "csv"
    pub input_extension: String,
}

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            sentinel_tokens: owned(&DEFAULT_SENTINEL_TOKENS),
            numeric_threshold: 0.6,
            date_sample_size: 5,
            date_keywords: owned(&DEFAULT_DATE_KEYWORDS),
            money_keywords: owned(&DEFAULT_MONEY_KEYWORDS),
            percent_keywords: owned(&DEFAULT_PERCENT_KEYWORDS),
            text_null_tokens: owned(&DEFAULT_TEXT_NULL_TOKENS),
            remove_duplicates: true,
            column_collision: CollisionPolicy::default(),
            output_prefix: "cleaned_".to_string(),
            input_extension: "csv".to_string(),
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> crate::error::Result<Self> {
        let context = format!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(CleaningError::Io)
            .context(context.as_str())?;
        let config: CleanerConfig = serde_json::from_str(&content)
            .map_err(CleaningError::Json)
            .context(context.as_str())?;
        config
            .validate()
            .map_err(|e| CleaningError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.numeric_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "numeric_threshold".to_string(),
                value: self.numeric_threshold,
            });
        }

        if self.date_sample_size == 0 {
            return Err(ConfigValidationError::InvalidSampleSize(
                self.date_sample_size,
            ));
        }

        for (field, keywords) in [
            ("date_keywords", &self.date_keywords),
            ("money_keywords", &self.money_keywords),
            ("percent_keywords", &self.percent_keywords),
        ] {
            if keywords.iter().any(|k| k.is_empty()) {
                return Err(ConfigValidationError::EmptyKeyword(field.to_string()));
            }
        }

        if self.input_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigValidationError::EmptyExtension);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid date sample size: {0} (must be at least 1)")]
    InvalidSampleSize(usize),

    #[error("Empty keyword in '{0}' would match every column")]
    EmptyKeyword(String),

    #[error("Input extension must not be empty")]
    EmptyExtension,
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    sentinel_tokens: Option<Vec<String>>,
    numeric_threshold: Option<f64>,
    date_sample_size: Option<usize>,
    date_keywords: Option<Vec<String>>,
    money_keywords: Option<Vec<String>>,
    percent_keywords: Option<Vec<String>>,
    text_null_tokens: Option<Vec<String>>,
    remove_duplicates: Option<bool>,
    column_collision: Option<CollisionPolicy>,
    output_prefix: Option<String>,
    input_extension: Option<String>,
}

impl CleanerConfigBuilder {
    /// Replace the sentinel token list.
    pub fn sentinel_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sentinel_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Set the numeric classification threshold.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0; the share must be strictly greater
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.numeric_threshold = Some(threshold);
        self
    }

    /// Set how many leading non-null values the date sniffer inspects.
    pub fn date_sample_size(mut self, size: usize) -> Self {
        self.date_sample_size = Some(size);
        self
    }

    /// Replace the date keyword list.
    pub fn date_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the money keyword list.
    pub fn money_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.money_keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the percent keyword list.
    pub fn percent_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.percent_keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the list of text values treated as missing by the mode imputer.
    pub fn text_null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_null_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set the header collision policy.
    pub fn column_collision(mut self, policy: CollisionPolicy) -> Self {
        self.column_collision = Some(policy);
        self
    }

    /// Set the prefix for cleaned output file names.
    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    /// Set the extension of input files (without the dot).
    pub fn input_extension(mut self, extension: impl Into<String>) -> Self {
        self.input_extension = Some(extension.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let defaults = CleanerConfig::default();
        let config = CleanerConfig {
            sentinel_tokens: self.sentinel_tokens.unwrap_or(defaults.sentinel_tokens),
            numeric_threshold: self.numeric_threshold.unwrap_or(defaults.numeric_threshold),
            date_sample_size: self.date_sample_size.unwrap_or(defaults.date_sample_size),
            date_keywords: self.date_keywords.unwrap_or(defaults.date_keywords),
            money_keywords: self.money_keywords.unwrap_or(defaults.money_keywords),
            percent_keywords: self.percent_keywords.unwrap_or(defaults.percent_keywords),
            text_null_tokens: self.text_null_tokens.unwrap_or(defaults.text_null_tokens),
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            column_collision: self.column_collision.unwrap_or(defaults.column_collision),
            output_prefix: self.output_prefix.unwrap_or(defaults.output_prefix),
            input_extension: self.input_extension.unwrap_or(defaults.input_extension),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert_eq!(config.numeric_threshold, 0.6);
        assert_eq!(config.date_sample_size, 5);
        assert_eq!(config.sentinel_tokens.len(), 7);
        assert!(config.money_keywords.contains(&"total".to_string()));
        assert_eq!(config.column_collision, CollisionPolicy::Suffix);
        assert!(config.remove_duplicates);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = CleanerConfig::builder().build().unwrap();
        assert_eq!(config, CleanerConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleanerConfig::builder()
            .numeric_threshold(0.75)
            .date_sample_size(3)
            .money_keywords(["fee"])
            .column_collision(CollisionPolicy::Reject)
            .output_prefix("clean-")
            .build()
            .unwrap();

        assert_eq!(config.numeric_threshold, 0.75);
        assert_eq!(config.date_sample_size, 3);
        assert_eq!(config.money_keywords, vec!["fee".to_string()]);
        assert_eq!(config.column_collision, CollisionPolicy::Reject);
        assert_eq!(config.output_prefix, "clean-");
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = CleanerConfig::builder().numeric_threshold(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_zero_sample_size() {
        let result = CleanerConfig::builder().date_sample_size(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSampleSize(0)
        ));
    }

    #[test]
    fn test_validation_empty_keyword() {
        let result = CleanerConfig::builder().percent_keywords(["pct", ""]).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyKeyword(_)
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "numeric_threshold": 0.5,
            "column_collision": "Reject",
            "output_prefix": "tidy_"
        }"#;

        let config: CleanerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.numeric_threshold, 0.5);
        assert_eq!(config.column_collision, CollisionPolicy::Reject);
        assert_eq!(config.output_prefix, "tidy_");
        // Unspecified fields fall back to defaults
        assert_eq!(config.date_sample_size, 5);
        assert_eq!(config.date_keywords, vec!["date".to_string()]);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cleaner.json");

        std::fs::write(&path, r#"{"money_keywords": ["fee"]}"#).unwrap();
        let config = CleanerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.money_keywords, vec!["fee".to_string()]);

        std::fs::write(&path, r#"{"numeric_threshold": 3.0}"#).unwrap();
        let err = CleanerConfig::from_json_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = CleanerConfig::from_json_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Loading configuration"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = CleanerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CleanerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
