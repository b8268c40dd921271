//! Column classification and dataset profiling.
//!
//! This module provides:
//! - [`ColumnClassifier`]: the one canonical rule deciding whether a column
//!   is numeric or categorical, used everywhere a numeric-column list is
//!   needed
//! - [`DataProfiler`]: upload summaries, descriptive statistics and
//!   correlation over the numeric columns of a dataset

mod statistics;
mod type_inference;

use tracing::debug;

use crate::error::{ProcessingError, Result, ResultExt};
use crate::stats::chi_squared_independence;
use crate::types::{
    CellValue, ChiSquaredPair, ColumnKind, ColumnStatistics, CorrelationMatrix, Dataset,
    UploadSummary,
};

pub(crate) use type_inference::infer_column_kind;

/// Decides, per column, whether it is numeric or categorical.
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// One kind per header, in header order.
    pub fn classify(dataset: &Dataset) -> Vec<ColumnKind> {
        (0..dataset.column_count())
            .filter_map(|index| infer_column_kind(dataset, index))
            .collect()
    }

    /// Kind of a single column, `None` when the index is out of range.
    pub fn classify_column(dataset: &Dataset, index: usize) -> Option<ColumnKind> {
        infer_column_kind(dataset, index)
    }

    /// Indices of the numeric columns.
    pub fn numeric_columns(dataset: &Dataset) -> Vec<usize> {
        Self::columns_of_kind(dataset, ColumnKind::Numeric)
    }

    /// Indices of the categorical columns.
    pub fn categorical_columns(dataset: &Dataset) -> Vec<usize> {
        Self::columns_of_kind(dataset, ColumnKind::Categorical)
    }

    fn columns_of_kind(dataset: &Dataset, kind: ColumnKind) -> Vec<usize> {
        Self::classify(dataset)
            .into_iter()
            .enumerate()
            .filter(|(_, k)| *k == kind)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Extract column `index` as floats.
///
/// Fails with [`ProcessingError::ColumnNotNumeric`] when the column is
/// categorical, so callers never see silently coerced `NaN` values.
pub fn numeric_values(dataset: &Dataset, index: usize) -> Result<Vec<f64>> {
    let name = dataset
        .header(index)
        .ok_or_else(|| ProcessingError::ColumnNotFound(format!("#{}", index)))?;
    let cells = dataset
        .column(index)
        .ok_or_else(|| ProcessingError::ColumnNotFound(name.to_string()))?;

    cells
        .map(CellValue::as_number)
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| ProcessingError::ColumnNotNumeric(name.to_string()))
}

/// Cells of column `index`, cloned in row order.
pub fn column_cells(dataset: &Dataset, index: usize) -> Result<Vec<CellValue>> {
    dataset
        .column(index)
        .map(|cells| cells.cloned().collect())
        .ok_or_else(|| ProcessingError::ColumnNotFound(format!("#{}", index)))
}

/// Cells of column `index` as contingency-table categories.
///
/// A numeric column is coerced cell by cell, so `"3"` and `3` fall in the
/// same category. Categorical columns keep their raw cells.
pub fn contingency_cells(dataset: &Dataset, index: usize) -> Result<Vec<CellValue>> {
    match ColumnClassifier::classify_column(dataset, index) {
        Some(ColumnKind::Numeric) => Ok(numeric_values(dataset, index)?
            .into_iter()
            .map(CellValue::Number)
            .collect()),
        _ => column_cells(dataset, index),
    }
}

/// Data profiler for the views that summarize a dataset.
pub struct DataProfiler;

impl DataProfiler {
    /// Column lists and a leading-rows preview for the upload view.
    pub fn upload_summary(dataset: &Dataset, preview_rows: usize) -> UploadSummary {
        let kinds = ColumnClassifier::classify(dataset);
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        for (header, kind) in dataset.headers().iter().zip(&kinds) {
            match kind {
                ColumnKind::Numeric => numeric_columns.push(header.clone()),
                ColumnKind::Categorical => categorical_columns.push(header.clone()),
            }
        }

        debug!(
            "Classified {} numeric and {} categorical columns",
            numeric_columns.len(),
            categorical_columns.len()
        );

        UploadSummary {
            file_name: dataset.file_name().to_string(),
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            numeric_columns,
            categorical_columns,
            preview: dataset.preview(preview_rows).to_vec(),
        }
    }

    /// Descriptive statistics for every numeric column.
    ///
    /// Fails with [`ProcessingError::EmptyInput`] on a dataset with no rows.
    pub fn profile(dataset: &Dataset) -> Result<Vec<ColumnStatistics>> {
        Self::numeric_table(dataset)?
            .iter()
            .map(|(name, xs)| {
                statistics::column_statistics(name, xs)
                    .context(format!("Profiling column '{}'", name))
            })
            .collect()
    }

    /// Correlation and covariance between every pair of numeric columns.
    pub fn correlation(dataset: &Dataset) -> Result<CorrelationMatrix> {
        statistics::correlation_matrix(&Self::numeric_table(dataset)?)
    }

    /// Chi-squared statistic for every pair of categorical columns.
    ///
    /// A failing pair is reported in place rather than aborting the others.
    pub fn chi_squared_categorical(dataset: &Dataset) -> Result<Vec<ChiSquaredPair>> {
        let categorical = ColumnClassifier::categorical_columns(dataset);
        let mut pairs = Vec::new();

        for (pos, &i) in categorical.iter().enumerate() {
            for &j in &categorical[pos + 1..] {
                let a = column_cells(dataset, i)?;
                let b = column_cells(dataset, j)?;
                let first = dataset.headers()[i].clone();
                let second = dataset.headers()[j].clone();
                let pair = match chi_squared_independence(&a, &b) {
                    Ok(result) => ChiSquaredPair {
                        first,
                        second,
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => ChiSquaredPair {
                        first,
                        second,
                        result: None,
                        error: Some(e.to_string()),
                    },
                };
                pairs.push(pair);
            }
        }

        Ok(pairs)
    }

    fn numeric_table(dataset: &Dataset) -> Result<Vec<(String, Vec<f64>)>> {
        ColumnClassifier::numeric_columns(dataset)
            .into_iter()
            .map(|index| Ok((dataset.headers()[index].clone(), numeric_values(dataset, index)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn mixed() -> Dataset {
        parse(
            "id,height,city,code\n1,1.80,Oslo,7\n2,1.65,Lima,x\n3,1.72,Oslo,9\n",
            "mixed.csv",
        )
        .unwrap()
    }

    #[test]
    fn test_classify_full_column_rule() {
        let kinds = ColumnClassifier::classify(&mixed());
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Numeric,
                ColumnKind::Categorical,
                ColumnKind::Categorical,
            ]
        );
        assert_eq!(ColumnClassifier::numeric_columns(&mixed()), vec![0, 1]);
        assert_eq!(ColumnClassifier::categorical_columns(&mixed()), vec![2, 3]);
    }

    #[test]
    fn test_numeric_values() {
        let ds = mixed();
        assert_eq!(numeric_values(&ds, 1).unwrap(), vec![1.80, 1.65, 1.72]);
        assert!(matches!(
            numeric_values(&ds, 3),
            Err(ProcessingError::ColumnNotNumeric(name)) if name == "code"
        ));
        assert!(matches!(
            numeric_values(&ds, 9),
            Err(ProcessingError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_upload_summary() {
        let summary = DataProfiler::upload_summary(&mixed(), 2);
        assert_eq!(summary.file_name, "mixed.csv");
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.column_count, 4);
        assert_eq!(summary.numeric_columns, vec!["id", "height"]);
        assert_eq!(summary.categorical_columns, vec!["city", "code"]);
        assert_eq!(summary.preview.len(), 2);
    }

    #[test]
    fn test_profile_numeric_only() {
        let profile = DataProfiler::profile(&mixed()).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].column, "id");
        assert_eq!(profile[0].mean, 2.0);
        assert_eq!(profile[1].max, 1.8);
    }

    #[test]
    fn test_profile_no_rows() {
        let ds = parse("a,b\n", "empty.csv").unwrap();
        assert_eq!(DataProfiler::profile(&ds).unwrap_err().error_code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_chi_squared_categorical_pairs() {
        let pairs = DataProfiler::chi_squared_categorical(&mixed()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first, "city");
        assert_eq!(pairs[0].second, "code");
        assert!(pairs[0].result.is_some());
        assert!(pairs[0].error.is_none());
    }
}
