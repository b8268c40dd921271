//! Custom error types for dataset parsing and statistical processing.
//!
//! This module provides the error hierarchy using `thiserror`. Every
//! statistical operation fails closed: degenerate inputs produce a typed
//! error instead of a `NaN` or infinite value.
//!
//! Errors are serializable so a frontend can display them without knowing
//! the Rust types.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the processing library.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// A data row does not have as many fields as the header.
    ///
    /// `line` is the 1-based line of the row in its textual form, counting
    /// the header as line 1.
    #[error("Malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The input text contained no header line.
    #[error("Input contains no header line")]
    MissingHeader,

    /// An operation that needs at least one value received none.
    #[error("Cannot compute over an empty input")]
    EmptyInput,

    /// Min-max normalization over a column whose minimum equals its maximum.
    #[error("Degenerate range: all values are equal to {value}")]
    DegenerateRange { value: f64 },

    /// Z-score normalization over a column with zero standard deviation.
    #[error("Degenerate distribution: standard deviation is zero")]
    DegenerateDistribution,

    /// Decimal scaling over a column where every value is zero.
    #[error("Decimal scaling is undefined when every value is zero")]
    AllZeroInput,

    /// A chi-squared expected frequency evaluated to zero.
    #[error("Expected frequency is zero for cell ({first}, {second})")]
    ZeroExpectedFrequency { first: String, second: String },

    /// An intermediate result left the finite range of `f64`.
    #[error("Numeric overflow while computing the {0}")]
    NumericOverflow(&'static str),

    /// Two paired samples have different lengths.
    #[error("Length mismatch: {left} values paired with {right} values")]
    LengthMismatch { left: usize, right: usize },

    /// Equal-width binning was asked for zero bins.
    #[error("Invalid bin count: {0} (must be at least 1)")]
    InvalidBinCount(usize),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric operation was requested on a categorical column.
    #[error("Column '{0}' is not numeric")]
    ColumnNotNumeric(String),

    /// No dataset is loaded in the store.
    #[error("No data loaded")]
    NoDataLoaded,

    /// The dataset was replaced while an operation was working on it.
    #[error("Dataset was replaced before the result of '{0}' could be published")]
    DatasetReplaced(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRow { .. } => "MALFORMED_ROW",
            Self::MissingHeader => "MISSING_HEADER",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::DegenerateRange { .. } => "DEGENERATE_RANGE",
            Self::DegenerateDistribution => "DEGENERATE_DISTRIBUTION",
            Self::AllZeroInput => "ALL_ZERO_INPUT",
            Self::ZeroExpectedFrequency { .. } => "ZERO_EXPECTED_FREQUENCY",
            Self::NumericOverflow(_) => "NUMERIC_OVERFLOW",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::InvalidBinCount(_) => "INVALID_BIN_COUNT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::ColumnNotNumeric(_) => "COLUMN_NOT_NUMERIC",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::DatasetReplaced(_) => "DATASET_REPLACED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the data or the request rather than
    /// by the environment.
    ///
    /// Recoverable errors are shown to the user next to the control that
    /// triggered them; the loaded dataset stays usable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) | Self::Polars(_) | Self::Json(_) => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(ProcessingError::EmptyInput.error_code(), "EMPTY_INPUT");
        assert_eq!(
            ProcessingError::DegenerateRange { value: 2.0 }.error_code(),
            "DEGENERATE_RANGE"
        );
        assert_eq!(
            ProcessingError::ColumnNotFound("age".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            ProcessingError::NumericOverflow("variance").error_code(),
            "NUMERIC_OVERFLOW"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ProcessingError::DegenerateDistribution.is_recoverable());
        assert!(ProcessingError::NoDataLoaded.is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!ProcessingError::Io(io).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProcessingError::MalformedRow {
            line: 4,
            expected: 3,
            found: 2,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MALFORMED_ROW"));
        assert!(json.contains("line 4"));
    }

    #[test]
    fn test_with_context() {
        let error = ProcessingError::AllZeroInput.with_context("Normalizing column 'score'");
        assert!(error.to_string().contains("Normalizing column 'score'"));
        assert_eq!(error.error_code(), "ALL_ZERO_INPUT");
    }
}
