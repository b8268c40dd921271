//! Error types for the datalens-learning crate.
//!
//! This module defines [`LearningError`], the error type returned by every
//! public API function in the crate.
//!
//! # Example
//!
//! ```no_run
//! use datalens_learning::{ClassificationConfig, LearningError};
//!
//! fn configure() -> Result<ClassificationConfig, LearningError> {
//!     // Errors are propagated with ?
//!     let config = ClassificationConfig::builder()
//!         .target_column("species")
//!         .classifier("nearest_neighbor")
//!         .build()?;
//!     Ok(config)
//! }
//! ```

use datalens_processing::ProcessingError;
use thiserror::Error;

/// The main error type for classification operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid configuration for a classification run.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No strategy with this name is registered.
    ///
    /// The registry ships empty; strategies must be registered explicitly.
    #[error("No classifier registered under '{0}'")]
    UnknownClassifier(String),

    /// The target column was not found in the dataset.
    ///
    /// Column names are case-sensitive.
    #[error("Target column '{0}' not found")]
    TargetNotFound(String),

    /// The dataset cannot be used for training or evaluation.
    ///
    /// Common causes:
    /// - A feature column is categorical
    /// - Too few rows to hold out a test split
    /// - No feature columns remain after removing the target
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A strategy failed while training.
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// Actual and predicted label sequences differ in length.
    #[error("Length mismatch: {actual} actual labels vs {predicted} predictions")]
    LengthMismatch {
        /// Number of actual labels.
        actual: usize,
        /// Number of predicted labels.
        predicted: usize,
    },

    /// Error raised while reading the dataset.
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LearningError::UnknownClassifier("tree".to_string()).to_string(),
            "No classifier registered under 'tree'"
        );
        assert_eq!(
            LearningError::LengthMismatch {
                actual: 3,
                predicted: 2
            }
            .to_string(),
            "Length mismatch: 3 actual labels vs 2 predictions"
        );
    }

    #[test]
    fn test_processing_error_is_transparent() {
        let err: LearningError = ProcessingError::ColumnNotNumeric("city".to_string()).into();
        assert!(matches!(err, LearningError::Processing(_)));
        assert!(err.to_string().contains("city"));
    }
}
