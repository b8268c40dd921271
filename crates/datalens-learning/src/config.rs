//! Configuration for a classification run.

use serde::{Deserialize, Serialize};

use crate::error::LearningError;

/// Settings for one classification run over the current dataset.
///
/// Use [`ClassificationConfig::builder()`] to create a validated
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Column holding the class label. Required.
    pub target_column: String,

    /// Numeric columns used as features. Empty means every numeric column
    /// except the target.
    pub feature_columns: Vec<String>,

    /// Name of the registered strategy to run. Required.
    pub classifier: String,

    /// Fraction of rows held out for evaluation, taken from the end of the
    /// dataset (default: 0.2).
    pub test_size: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            target_column: String::new(),
            feature_columns: Vec::new(),
            classifier: String::new(),
            test_size: 0.2,
        }
    }
}

impl ClassificationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClassificationConfigBuilder {
        ClassificationConfigBuilder::default()
    }

    /// Number of held-out rows for a dataset of `rows` rows (at least one).
    pub fn test_rows(&self, rows: usize) -> usize {
        ((rows as f64 * self.test_size).round() as usize).max(1)
    }
}

/// Builder for [`ClassificationConfig`].
///
/// # Example
///
/// ```rust
/// use datalens_learning::ClassificationConfig;
///
/// let config = ClassificationConfig::builder()
///     .target_column("species")
///     .feature_columns(["petal_length", "petal_width"])
///     .classifier("nearest_neighbor")
///     .test_size(0.3)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.feature_columns.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassificationConfigBuilder {
    config: ClassificationConfig,
}

impl ClassificationConfigBuilder {
    /// Set the target column name.
    #[must_use]
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.config.target_column = column.into();
        self
    }

    /// Restrict the feature columns.
    #[must_use]
    pub fn feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.feature_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the strategy name, as registered in a
    /// [`ClassifierRegistry`](crate::ClassifierRegistry).
    #[must_use]
    pub fn classifier(mut self, name: impl Into<String>) -> Self {
        self.config.classifier = name.into();
        self
    }

    /// Set the held-out fraction (default: 0.2).
    #[must_use]
    pub fn test_size(mut self, size: f64) -> Self {
        self.config.test_size = size;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] if:
    /// - `target_column` or `classifier` is empty
    /// - `test_size` is not in range `(0.0, 1.0)`
    /// - the target is also listed as a feature
    pub fn build(self) -> Result<ClassificationConfig, LearningError> {
        if self.config.target_column.trim().is_empty() {
            return Err(LearningError::InvalidConfig(
                "target_column is required".to_string(),
            ));
        }

        if self.config.classifier.trim().is_empty() {
            return Err(LearningError::InvalidConfig(
                "classifier is required".to_string(),
            ));
        }

        if !(self.config.test_size > 0.0 && self.config.test_size < 1.0) {
            return Err(LearningError::InvalidConfig(
                "test_size must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        if self
            .config
            .feature_columns
            .contains(&self.config.target_column)
        {
            return Err(LearningError::InvalidConfig(format!(
                "target column '{}' cannot also be a feature",
                self.config.target_column
            )));
        }

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ClassificationConfigBuilder {
        ClassificationConfig::builder()
            .target_column("label")
            .classifier("stub")
    }

    #[test]
    fn test_default_config() {
        let config = base().build().unwrap();
        assert_eq!(config.test_size, 0.2);
        assert!(config.feature_columns.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(ClassificationConfig::builder().classifier("stub").build().is_err());
        assert!(ClassificationConfig::builder().target_column("label").build().is_err());
    }

    #[test]
    fn test_invalid_test_size() {
        assert!(base().test_size(0.0).build().is_err());
        assert!(base().test_size(1.0).build().is_err());
        assert!(base().test_size(f64::NAN).build().is_err());
        assert!(base().test_size(0.5).build().is_ok());
    }

    #[test]
    fn test_target_as_feature_rejected() {
        let err = base().feature_columns(["a", "label"]).build().unwrap_err();
        assert!(matches!(err, LearningError::InvalidConfig(_)));
    }

    #[test]
    fn test_test_rows() {
        let config = base().test_size(0.25).build().unwrap();
        assert_eq!(config.test_rows(8), 2);
        assert_eq!(config.test_rows(1), 1);
    }
}
