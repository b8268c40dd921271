use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::stats::descriptive::value_bits;
use crate::utils::{is_missing_marker, parse_finite_number};

// ============================================================================
// Cell Values
// ============================================================================

/// One table entry: either a number or a piece of text.
///
/// Serialized untagged, so JSON numbers and strings map straight onto the
/// two variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a cell from a raw delimited field.
    ///
    /// The field is trimmed; it becomes a `Number` when it parses as a finite
    /// number and stays `Text` otherwise.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        match parse_finite_number(trimmed) {
            Some(value) => CellValue::Number(value),
            None => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Numeric coercion: numbers as-is, text only when it parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => parse_finite_number(text),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Number(_) => None,
            CellValue::Text(text) => Some(text),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Check if the cell is absent: empty text or one of `markers`.
    pub fn is_missing(&self, markers: &[String]) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Text(text) => text.trim().is_empty() || is_missing_marker(text, markers),
        }
    }
}

/// Hashable identity of a cell, for grouping and duplicate detection.
/// `-0.0` and `0.0` share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey {
    Number(u64),
    Text(String),
}

impl From<&CellValue> for CellKey {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Number(x) => CellKey::Number(value_bits(*x)),
            CellValue::Text(text) => CellKey::Text(text.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// An immutable table: source file name, ordered headers and ordered rows.
///
/// Every row has exactly `headers.len()` cells. Operations that look like
/// mutation (removing rows) return a new `Dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DatasetParts")]
pub struct Dataset {
    file_name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Unvalidated wire form of a [`Dataset`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetParts {
    file_name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TryFrom<DatasetParts> for Dataset {
    type Error = ProcessingError;

    fn try_from(parts: DatasetParts) -> Result<Self> {
        Dataset::new(parts.file_name, parts.headers, parts.rows)
    }
}

impl Dataset {
    /// Create a dataset, rejecting rows whose length differs from the header.
    ///
    /// Row `i` is reported as line `i + 2`, the header being line 1.
    pub fn new(
        file_name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ProcessingError::MalformedRow {
                line: index + 2,
                expected: headers.len(),
                found: row.len(),
            });
        }

        Ok(Self {
            file_name: file_name.into(),
            headers,
            rows,
        })
    }

    /// Same headers and file name, different rows.
    ///
    /// Callers only pass rows taken from `self`, so the row-length
    /// invariant carries over.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == self.headers.len()));
        Self {
            file_name: self.file_name.clone(),
            headers: self.headers.clone(),
            rows,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(String::as_str)
    }

    /// Index of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve a column reference to an index.
    pub fn resolve_column(&self, column: &ColumnRef) -> Result<usize> {
        match column {
            ColumnRef::Index(index) if *index < self.headers.len() => Ok(*index),
            ColumnRef::Index(_) => Err(ProcessingError::ColumnNotFound(column.to_string())),
            ColumnRef::Name(name) => self
                .column_index(name)
                .ok_or_else(|| ProcessingError::ColumnNotFound(name.clone())),
        }
    }

    /// Cells of one column in row order, or `None` for an out-of-range index.
    pub fn column(&self, index: usize) -> Option<impl Iterator<Item = &CellValue> + '_> {
        (index < self.headers.len()).then(|| self.rows.iter().map(move |row| &row[index]))
    }

    /// The first `n` rows.
    pub fn preview(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Comma-joined text form: header line, then one line per row.
    pub fn to_csv_string(&self) -> String {
        let mut out = self.headers.join(",");
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(ToString::to_string).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// Column Addressing & Classification
// ============================================================================

/// Reference to a column by position or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(index) => write!(f, "#{}", index),
            ColumnRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

/// Whether a column holds numbers or categories. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

// ============================================================================
// Engine Outputs
// ============================================================================

/// Normalized values of one column, in row order.
pub type NormalizedVector = Vec<f64>;

/// Bin index of every value of one column, in row order.
pub type BinnedVector = Vec<usize>;

/// Normalization methods offered by the preprocessing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// `(x - min) / (max - min)`
    #[default]
    MinMax,
    /// `(x - mean) / std_dev`
    ZScore,
    /// `x / 10^j` with `j = ceil(log10(max |x|))`
    DecimalScaling,
}

impl NormalizationMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MinMax => "Min-Max",
            Self::ZScore => "Z-Score",
            Self::DecimalScaling => "Decimal Scaling",
        }
    }
}

/// One observed cell of a contingency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyCell {
    pub first: CellValue,
    pub second: CellValue,
    pub observed: usize,
    pub expected: f64,
}

/// Result of a chi-squared independence test.
///
/// `contingency_table` lists observed pairs in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredResult {
    pub statistic: f64,
    pub sample_size: usize,
    pub contingency_table: Vec<ContingencyCell>,
}

impl ChiSquaredResult {
    /// Observed count of the `(first, second)` pair, zero when never seen.
    pub fn observed(&self, first: &CellValue, second: &CellValue) -> usize {
        self.contingency_table
            .iter()
            .find(|cell| &cell.first == first && &cell.second == second)
            .map(|cell| cell.observed)
            .unwrap_or(0)
    }
}

/// Chi-squared outcome for one pair of categorical columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChiSquaredPair {
    pub first: String,
    pub second: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ChiSquaredResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Descriptive statistics of one numeric column.
///
/// Variance is the population variance. All values are rounded to three
/// decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Pairwise correlation and covariance between numeric columns.
///
/// Correlation is `None` when either column has zero variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub correlation: Vec<Vec<Option<f64>>>,
    pub covariance: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two columns by name.
    pub fn correlation_between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.correlation[i][j]
    }
}

// ============================================================================
// View Summaries
// ============================================================================

/// What the upload view shows after a file is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub file_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub preview: Vec<Vec<CellValue>>,
}

/// Row-filtering operations that write a new dataset back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningOperation {
    RemoveMissingValues,
    RemoveDuplicates,
}

/// Outcome of a row-filtering operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub operation: CleaningOperation,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
}

impl CleaningReport {
    pub fn new(operation: CleaningOperation, rows_before: usize, rows_after: usize) -> Self {
        Self {
            operation,
            rows_before,
            rows_after,
            rows_removed: rows_before - rows_after,
        }
    }

    /// Percentage of rows removed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f32 / self.rows_before as f32) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            "people.csv",
            vec!["age".to_string(), "city".to_string()],
            vec![
                vec![CellValue::Number(31.0), CellValue::from("Oslo")],
                vec![CellValue::Number(45.5), CellValue::from("Lima")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cell_from_field() {
        assert_eq!(CellValue::from_field(" 3.5 "), CellValue::Number(3.5));
        assert_eq!(CellValue::from_field(" red "), CellValue::from("red"));
        assert_eq!(CellValue::from_field(""), CellValue::from(""));
        assert_eq!(CellValue::from_field("nan"), CellValue::from("nan"));
    }

    #[test]
    fn test_cell_is_missing() {
        let markers = vec!["N/A".to_string()];
        assert!(CellValue::from("").is_missing(&markers));
        assert!(CellValue::from("  ").is_missing(&markers));
        assert!(CellValue::from("n/a").is_missing(&markers));
        assert!(!CellValue::from("x").is_missing(&markers));
        assert!(!CellValue::Number(0.0).is_missing(&markers));
    }

    #[test]
    fn test_dataset_rejects_ragged_rows() {
        let err = Dataset::new(
            "bad.csv",
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![CellValue::Number(1.0), CellValue::Number(2.0)],
                vec![CellValue::Number(3.0)],
            ],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ProcessingError::MalformedRow {
                line: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_resolve_column() {
        let ds = sample();
        assert_eq!(ds.resolve_column(&"city".into()).unwrap(), 1);
        assert_eq!(ds.resolve_column(&0usize.into()).unwrap(), 0);
        assert!(matches!(
            ds.resolve_column(&5usize.into()),
            Err(ProcessingError::ColumnNotFound(_))
        ));
        assert!(matches!(
            ds.resolve_column(&"zip".into()),
            Err(ProcessingError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_column_iterator() {
        let ds = sample();
        let ages: Vec<f64> = ds.column(0).unwrap().filter_map(CellValue::as_number).collect();
        assert_eq!(ages, vec![31.0, 45.5]);
        assert!(ds.column(2).is_none());
    }

    #[test]
    fn test_to_csv_string() {
        assert_eq!(sample().to_csv_string(), "age,city\n31,Oslo\n45.5,Lima\n");
    }

    #[test]
    fn test_dataset_json_roundtrip_validates() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"fileName\":\"people.csv\""));
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());

        let ragged = r#"{"fileName":"x.csv","headers":["a","b"],"rows":[[1]]}"#;
        assert!(serde_json::from_str::<Dataset>(ragged).is_err());
    }

    #[test]
    fn test_cleaning_report_percentage() {
        let report = CleaningReport::new(CleaningOperation::RemoveMissingValues, 4, 3);
        assert_eq!(report.rows_removed, 1);
        assert_eq!(report.rows_removed_percentage(), 25.0);
    }
}
