//! Dataset Preprocessing and Statistics Library
//!
//! The core of an interactive dataset explorer: a parser for delimited text,
//! a shared dataset store that keeps independent views in sync, and a
//! statistical engine for the preprocessing and charting views.
//!
//! # Overview
//!
//! - **Parsing**: comma-delimited text to a typed [`Dataset`] of
//!   [`CellValue::Number`] / [`CellValue::Text`] cells, with row-length
//!   validation
//! - **Shared state**: [`DatasetStore`], a single-slot broadcast cell with
//!   replay-on-subscribe and ordered delivery
//! - **Classification**: [`ColumnClassifier`], the one full-column rule for
//!   numeric versus categorical columns
//! - **Statistics**: normalization (min-max, z-score, decimal scaling),
//!   equal-width binning, chi-squared independence, descriptive statistics
//!   and correlation
//! - **Cleaning**: missing-value and duplicate-row removal, written back
//!   through the store
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datalens_processing::{NormalizationMethod, ProcessingConfig, Workbench};
//!
//! let bench = Workbench::new(ProcessingConfig::default());
//!
//! // Any view can watch the store; it gets the current value right away.
//! let sub = bench.store().subscribe_fn(|dataset| {
//!     if let Some(ds) = dataset {
//!         println!("now showing {} ({} rows)", ds.file_name(), ds.row_count());
//!     }
//! });
//!
//! let summary = bench.load_text("age,city\n31,Oslo\n,Lima\n45,Oslo\n", "people.csv")?;
//! println!("numeric columns: {:?}", summary.numeric_columns);
//!
//! let report = bench.remove_missing_values()?;
//! println!("removed {} rows", report.rows_removed);
//!
//! let scaled = bench.normalize("age", Some(NormalizationMethod::ZScore))?;
//! let bins = bench.discretize("age", Some(3))?;
//! let chi = bench.chi_squared("age", "city")?;
//!
//! sub.unsubscribe();
//! ```
//!
//! # Error Handling
//!
//! Every statistical function fails closed with a [`ProcessingError`] rather
//! than producing `NaN` or infinity, and a failed operation never changes the
//! store's held dataset.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod frame;
pub mod parser;
pub mod profiler;
pub mod stats;
pub mod store;
pub mod types;
pub mod utils;
pub mod workbench;

// Re-export main types for convenience
pub use cleaner::DataCleaner;
pub use config::{ConfigValidationError, ProcessingConfig, ProcessingConfigBuilder};
pub use error::{ProcessingError, Result, ResultExt};
pub use parser::{CsvParser, parse};
pub use profiler::{ColumnClassifier, DataProfiler};
pub use store::{ClosureObserver, DatasetObserver, DatasetStore, Subscription};
pub use types::{
    BinnedVector, CellValue, ChiSquaredPair, ChiSquaredResult, CleaningOperation, CleaningReport,
    ColumnKind, ColumnRef, ColumnStatistics, ContingencyCell, CorrelationMatrix, Dataset,
    NormalizationMethod, NormalizedVector, UploadSummary,
};
pub use workbench::Workbench;

static_assertions::assert_impl_all!(Dataset: Send, Sync);
static_assertions::assert_impl_all!(Workbench: Send, Sync, Clone);
