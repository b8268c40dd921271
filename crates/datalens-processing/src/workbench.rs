//! Operation surface shared by the views.
//!
//! A [`Workbench`] owns a [`DatasetStore`] handle and runs every view-level
//! operation against the store's current snapshot. Reads (normalize,
//! discretize, chi-squared, profile, correlation, chart series) never touch
//! the store. The cleaning operations compute a new dataset and write it back
//! through [`DatasetStore::compare_and_set`]; when any step fails, or another
//! writer replaced the dataset in the meantime, the store keeps its value.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cleaner::DataCleaner;
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::parser::CsvParser;
use crate::profiler::{DataProfiler, contingency_cells, numeric_values};
use crate::stats::{chi_squared_independence, equal_width_binning, normalize};
use crate::store::DatasetStore;
use crate::types::{
    BinnedVector, ChiSquaredPair, ChiSquaredResult, CleaningOperation, CleaningReport, ColumnRef,
    ColumnStatistics, CorrelationMatrix, Dataset, NormalizationMethod, NormalizedVector,
    UploadSummary,
};

/// Runs parsing, cleaning and statistics against a shared [`DatasetStore`].
#[derive(Debug, Clone)]
pub struct Workbench {
    store: DatasetStore,
    config: ProcessingConfig,
    cleaner: DataCleaner,
    parser: CsvParser,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(ProcessingConfig::default())
    }
}

impl Workbench {
    /// Create a workbench with its own empty store.
    pub fn new(config: ProcessingConfig) -> Self {
        Self::with_store(DatasetStore::new(), config)
    }

    /// Create a workbench over an existing store, so several views can
    /// share one dataset.
    pub fn with_store(store: DatasetStore, config: ProcessingConfig) -> Self {
        let cleaner = DataCleaner::new(config.missing_markers.clone());
        Self {
            store,
            config,
            cleaner,
            parser: CsvParser::new(),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Current snapshot, or [`ProcessingError::NoDataLoaded`].
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        self.store.get().ok_or(ProcessingError::NoDataLoaded)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Parse `text` and publish it as the current dataset.
    pub fn load_text(&self, text: &str, file_name: &str) -> Result<UploadSummary> {
        let dataset = self
            .parser
            .parse(text, file_name)
            .inspect_err(|e| warn!("Failed to load '{}': {}", file_name, e))?;
        Ok(self.publish(dataset))
    }

    /// Read and parse a file from disk, then publish it.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<UploadSummary> {
        let path = path.as_ref();
        let dataset = self
            .parser
            .parse_file(path)
            .inspect_err(|e| warn!("Failed to load {}: {}", path.display(), e))?;
        Ok(self.publish(dataset))
    }

    fn publish(&self, dataset: Dataset) -> UploadSummary {
        let summary = DataProfiler::upload_summary(&dataset, self.config.preview_rows);
        info!(
            "Loaded '{}' ({} rows x {} columns)",
            summary.file_name, summary.row_count, summary.column_count
        );
        self.store.set(dataset);
        summary
    }

    /// Unload the current dataset.
    pub fn clear(&self) {
        self.store.clear();
    }

    // ------------------------------------------------------------------------
    // Cleaning (writes back to the store)
    // ------------------------------------------------------------------------

    /// Drop rows with a missing cell and publish the result.
    pub fn remove_missing_values(&self) -> Result<CleaningReport> {
        self.clean(CleaningOperation::RemoveMissingValues)
    }

    /// Drop repeated rows and publish the result.
    pub fn remove_duplicates(&self) -> Result<CleaningReport> {
        self.clean(CleaningOperation::RemoveDuplicates)
    }

    fn clean(&self, operation: CleaningOperation) -> Result<CleaningReport> {
        let current = self.dataset()?;
        let (cleaned, report) = self.cleaner.apply(operation, &current);
        if !self.store.compare_and_set(&current, cleaned) {
            warn!(
                "'{}' was replaced during {:?}; result dropped",
                current.file_name(),
                operation
            );
            return Err(ProcessingError::DatasetReplaced(format!("{:?}", operation)));
        }
        Ok(report)
    }

    // ------------------------------------------------------------------------
    // Transformations (read-only)
    // ------------------------------------------------------------------------

    /// Normalize a numeric column; `None` uses the configured default method.
    pub fn normalize(
        &self,
        column: impl Into<ColumnRef>,
        method: Option<NormalizationMethod>,
    ) -> Result<NormalizedVector> {
        let column = column.into();
        let method = method.unwrap_or(self.config.default_normalization);
        let xs = self.numeric_column(&column)?;
        normalize(&xs, method)
            .inspect_err(|e| warn!("{} of column {} failed: {}", method.display_name(), column, e))
    }

    /// Equal-width binning of a numeric column; `None` uses the configured
    /// default bin count.
    pub fn discretize(&self, column: impl Into<ColumnRef>, bins: Option<usize>) -> Result<BinnedVector> {
        let column = column.into();
        let bins = bins.unwrap_or(self.config.default_bin_count);
        let xs = self.numeric_column(&column)?;
        equal_width_binning(&xs, bins)
            .inspect_err(|e| warn!("Binning column {} failed: {}", column, e))
    }

    /// Chi-squared independence statistic between two columns of any kind.
    ///
    /// Numeric columns are grouped by value, whatever form their cells take.
    pub fn chi_squared(
        &self,
        first: impl Into<ColumnRef>,
        second: impl Into<ColumnRef>,
    ) -> Result<ChiSquaredResult> {
        let dataset = self.dataset()?;
        let (first, second) = (first.into(), second.into());
        let a = contingency_cells(&dataset, dataset.resolve_column(&first)?)?;
        let b = contingency_cells(&dataset, dataset.resolve_column(&second)?)?;
        chi_squared_independence(&a, &b)
            .inspect_err(|e| warn!("Chi-squared of {} and {} failed: {}", first, second, e))
    }

    /// Chi-squared statistic for every pair of categorical columns.
    pub fn chi_squared_categorical(&self) -> Result<Vec<ChiSquaredPair>> {
        DataProfiler::chi_squared_categorical(&*self.dataset()?)
    }

    /// Descriptive statistics for every numeric column.
    pub fn profile(&self) -> Result<Vec<ColumnStatistics>> {
        DataProfiler::profile(&*self.dataset()?)
    }

    /// Correlation and covariance matrices over the numeric columns.
    pub fn correlation(&self) -> Result<CorrelationMatrix> {
        DataProfiler::correlation(&*self.dataset()?)
    }

    // ------------------------------------------------------------------------
    // Chart series
    // ------------------------------------------------------------------------

    /// `(x, y)` points from two numeric columns, for a scatter plot.
    pub fn column_pairs(
        &self,
        x: impl Into<ColumnRef>,
        y: impl Into<ColumnRef>,
    ) -> Result<Vec<(f64, f64)>> {
        let xs = self.numeric_column(&x.into())?;
        let ys = self.numeric_column(&y.into())?;
        Ok(xs.into_iter().zip(ys).collect())
    }

    /// `(row index, value)` points from one numeric column, for a line plot.
    pub fn indexed_series(&self, column: impl Into<ColumnRef>) -> Result<Vec<(usize, f64)>> {
        Ok(self
            .numeric_column(&column.into())?
            .into_iter()
            .enumerate()
            .collect())
    }

    fn numeric_column(&self, column: &ColumnRef) -> Result<Vec<f64>> {
        let dataset = self.dataset()?;
        let index = dataset.resolve_column(column)?;
        numeric_values(&dataset, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "x,y,label\n1,10,a\n2,,b\n3,30,a\n4,40,b\n";

    fn loaded() -> Workbench {
        let bench = Workbench::default();
        bench.load_text(SAMPLE, "sample.csv").unwrap();
        bench
    }

    #[test]
    fn test_operations_need_data() {
        let bench = Workbench::default();
        assert!(matches!(
            bench.normalize("x", None),
            Err(ProcessingError::NoDataLoaded)
        ));
        assert!(matches!(
            bench.remove_missing_values(),
            Err(ProcessingError::NoDataLoaded)
        ));
        assert!(bench.store().get().is_none());
    }

    #[test]
    fn test_load_summary() {
        let bench = Workbench::default();
        let summary = bench.load_text(SAMPLE, "sample.csv").unwrap();
        assert_eq!(summary.row_count, 4);
        assert_eq!(summary.numeric_columns, vec!["x"]);
        // "y" has an empty cell, so it is categorical until cleaned
        assert_eq!(summary.categorical_columns, vec!["y", "label"]);
    }

    #[test]
    fn test_malformed_load_keeps_previous_dataset() {
        let bench = loaded();
        let err = bench.load_text("a,b\n1\n", "bad.csv").unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedRow { line: 2, .. }));
        assert_eq!(bench.dataset().unwrap().file_name(), "sample.csv");
    }

    #[test]
    fn test_normalize_by_name_and_index() {
        let bench = loaded();
        let by_name = bench.normalize("x", Some(NormalizationMethod::MinMax)).unwrap();
        let by_index = bench.normalize(0usize, None).unwrap();
        assert_eq!(by_name, vec![0.0, 0.333, 0.667, 1.0]);
        assert_eq!(by_name, by_index);
    }

    #[test]
    fn test_numeric_operation_on_categorical_column() {
        let bench = loaded();
        assert!(matches!(
            bench.normalize("label", None),
            Err(ProcessingError::ColumnNotNumeric(name)) if name == "label"
        ));
        assert!(matches!(
            bench.discretize("missing", None),
            Err(ProcessingError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_remove_missing_values_publishes() {
        let bench = loaded();
        let versions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&versions);
        let _sub = bench
            .store()
            .subscribe_fn(move |ds| sink.lock().push(ds.map(|d| d.row_count())));

        let report = bench.remove_missing_values().unwrap();
        assert_eq!(report.rows_removed, 1);
        assert_eq!(*versions.lock(), vec![Some(4), Some(3)]);

        // "y" is now numeric
        assert_eq!(bench.discretize("y", Some(3)).unwrap(), vec![0, 2, 2]);
    }

    #[test]
    fn test_failed_transform_leaves_store_unchanged() {
        let bench = Workbench::default();
        bench.load_text("c\n5\n5\n", "flat.csv").unwrap();
        let before = bench.dataset().unwrap();
        assert!(matches!(
            bench.normalize("c", Some(NormalizationMethod::MinMax)),
            Err(ProcessingError::DegenerateRange { .. })
        ));
        assert!(Arc::ptr_eq(&before, &bench.dataset().unwrap()));
    }

    #[test]
    fn test_chi_squared_any_columns() {
        let bench = loaded();
        let result = bench.chi_squared("x", "label").unwrap();
        assert_eq!(result.sample_size, 4);
    }

    #[test]
    fn test_chi_squared_groups_numeric_text_with_numbers() {
        let bench = Workbench::default();
        let ds = Dataset::new(
            "mixed.csv",
            vec!["n".to_string(), "k".to_string()],
            vec![
                vec![3.0.into(), "a".into()],
                vec!["3".into(), "a".into()],
                vec![4.0.into(), "b".into()],
                vec!["4".into(), "b".into()],
            ],
        )
        .unwrap();
        bench.store().set(ds);

        let result = bench.chi_squared("n", "k").unwrap();
        assert_eq!(result.contingency_table.len(), 2);
        assert_eq!(result.observed(&3.0.into(), &"a".into()), 2);
        assert_eq!(result.observed(&4.0.into(), &"b".into()), 2);
    }

    #[test]
    fn test_cleaning_publishes_over_its_own_snapshot() {
        let bench = loaded();
        let before = bench.dataset().unwrap();
        bench.remove_duplicates().unwrap();
        let after = bench.dataset().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.row_count(), 4);
    }

    #[test]
    fn test_chart_series() {
        let bench = loaded();
        bench.remove_missing_values().unwrap();
        assert_eq!(
            bench.column_pairs("x", "y").unwrap(),
            vec![(1.0, 10.0), (3.0, 30.0), (4.0, 40.0)]
        );
        assert_eq!(
            bench.indexed_series("y").unwrap(),
            vec![(0, 10.0), (1, 30.0), (2, 40.0)]
        );
    }

    #[test]
    fn test_shared_store_between_workbenches() {
        let upload = Workbench::default();
        let chart = Workbench::with_store(upload.store().clone(), ProcessingConfig::default());
        upload.load_text(SAMPLE, "sample.csv").unwrap();
        assert_eq!(chart.indexed_series("x").unwrap().len(), 4);
        upload.clear();
        assert!(matches!(chart.profile(), Err(ProcessingError::NoDataLoaded)));
    }
}
