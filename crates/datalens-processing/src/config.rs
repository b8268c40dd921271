//! Configuration for dataset processing.
//!
//! This module provides configuration options using the builder pattern.

use serde::{Deserialize, Serialize};

use crate::types::NormalizationMethod;

/// Configuration shared by the workbench operations.
///
/// Use [`ProcessingConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust
/// use datalens_processing::config::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .missing_markers(["NA", "?"])
///     .default_bin_count(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.default_bin_count, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Text values treated as missing, in addition to empty text.
    /// Compared after trimming, ignoring ASCII case.
    /// Default: none
    pub missing_markers: Vec<String>,

    /// Number of bins used for equal-width binning when none is given.
    /// Default: 3
    pub default_bin_count: usize,

    /// Number of rows included in an upload preview.
    /// Default: 10
    pub preview_rows: usize,

    /// Normalization method used when none is given.
    /// Default: MinMax
    pub default_normalization: NormalizationMethod,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            missing_markers: Vec::new(),
            default_bin_count: 3,
            preview_rows: 10,
            default_normalization: NormalizationMethod::default(),
        }
    }
}

impl ProcessingConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.default_bin_count == 0 {
            return Err(ConfigValidationError::InvalidBinCount(
                self.default_bin_count,
            ));
        }

        if self.missing_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigValidationError::BlankMissingMarker);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid default bin count: {0} (must be at least 1)")]
    InvalidBinCount(usize),

    #[error("Missing markers must not be blank; empty text is always treated as missing")]
    BlankMissingMarker,
}

impl From<ConfigValidationError> for crate::error::ProcessingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProcessingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ProcessingConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProcessingConfigBuilder {
    missing_markers: Option<Vec<String>>,
    default_bin_count: Option<usize>,
    preview_rows: Option<usize>,
    default_normalization: Option<NormalizationMethod>,
}

impl ProcessingConfigBuilder {
    /// Set the text values treated as missing.
    pub fn missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the bin count used when a caller does not pass one.
    pub fn default_bin_count(mut self, bins: usize) -> Self {
        self.default_bin_count = Some(bins);
        self
    }

    /// Set the number of rows shown in an upload preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the normalization method used when a caller does not pass one.
    pub fn default_normalization(mut self, method: NormalizationMethod) -> Self {
        self.default_normalization = Some(method);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProcessingConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProcessingConfig, ConfigValidationError> {
        let config = ProcessingConfig {
            missing_markers: self.missing_markers.unwrap_or_default(),
            default_bin_count: self.default_bin_count.unwrap_or(3),
            preview_rows: self.preview_rows.unwrap_or(10),
            default_normalization: self.default_normalization.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
