//! Row filtering for datasets.
//!
//! This module provides functionality for:
//! - Removing rows that contain a missing cell
//! - Removing duplicate rows
//!
//! Both operations return a new [`Dataset`] with the retained rows in their
//! original order; the input is never modified.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::types::{CellKey, CellValue, CleaningOperation, CleaningReport, Dataset};

/// Data cleaner for row-filtering operations.
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    missing_markers: Vec<String>,
}

impl DataCleaner {
    /// Create a cleaner that treats `missing_markers` as missing in addition
    /// to empty text.
    pub fn new(missing_markers: Vec<String>) -> Self {
        Self { missing_markers }
    }

    /// Drop every row containing at least one missing cell.
    ///
    /// Returns the new dataset and the number of rows removed. Applying it to
    /// its own output removes nothing further.
    pub fn remove_missing_values(&self, dataset: &Dataset) -> (Dataset, usize) {
        let kept: Vec<Vec<CellValue>> = dataset
            .rows()
            .iter()
            .filter(|row| !row.iter().any(|cell| cell.is_missing(&self.missing_markers)))
            .cloned()
            .collect();

        let removed = dataset.row_count() - kept.len();
        if removed > 0 {
            info!(
                "Removed {} rows with missing values from '{}'",
                removed,
                dataset.file_name()
            );
        } else {
            debug!("No rows with missing values found");
        }

        (dataset.with_rows(kept), removed)
    }

    /// Drop repeated rows, keeping the first occurrence of each.
    pub fn remove_duplicates(&self, dataset: &Dataset) -> (Dataset, usize) {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
        let kept: Vec<Vec<CellValue>> = dataset
            .rows()
            .iter()
            .filter(|row| seen.insert(row.iter().map(CellKey::from).collect()))
            .cloned()
            .collect();

        let removed = dataset.row_count() - kept.len();
        if removed > 0 {
            info!(
                "Removed {} duplicate rows from '{}'",
                removed,
                dataset.file_name()
            );
        } else {
            debug!("No duplicate rows found");
        }

        (dataset.with_rows(kept), removed)
    }

    /// Run `operation` and describe what it did.
    pub fn apply(&self, operation: CleaningOperation, dataset: &Dataset) -> (Dataset, CleaningReport) {
        let (cleaned, _) = match operation {
            CleaningOperation::RemoveMissingValues => self.remove_missing_values(dataset),
            CleaningOperation::RemoveDuplicates => self.remove_duplicates(dataset),
        };
        let report = CleaningReport::new(operation, dataset.row_count(), cleaned.row_count());
        (cleaned, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_missing_values_scenario() {
        let ds = Dataset::new(
            "xy.csv",
            vec!["x".to_string(), "y".to_string()],
            vec![
                vec![1.0.into(), "a".into()],
                vec![2.0.into(), "".into()],
                vec![3.0.into(), "b".into()],
            ],
        )
        .unwrap();

        let (cleaned, removed) = DataCleaner::default().remove_missing_values(&ds);
        assert_eq!(removed, 1);
        assert_eq!(
            cleaned.rows(),
            [
                vec![CellValue::Number(1.0), CellValue::from("a")],
                vec![CellValue::Number(3.0), CellValue::from("b")],
            ]
        );
        assert_eq!(cleaned.headers(), ds.headers());
        assert_eq!(cleaned.file_name(), "xy.csv");
        // input untouched
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn test_remove_missing_values_idempotent() {
        let ds = parse("a,b,c\n1,,x\n2,3,y\n,4,z\n5,6,\n7,8,w\n", "holes.csv").unwrap();
        let cleaner = DataCleaner::default();
        let (once, removed) = cleaner.remove_missing_values(&ds);
        assert_eq!(removed, 3);
        let (twice, removed_again) = cleaner.remove_missing_values(&once);
        assert_eq!(removed_again, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_missing_values_with_markers() {
        let ds = parse("a,b\n1,NA\n2,?\n3,ok\n", "markers.csv").unwrap();
        let cleaner = DataCleaner::new(vec!["na".to_string(), "?".to_string()]);
        let (cleaned, removed) = cleaner.remove_missing_values(&ds);
        assert_eq!(removed, 2);
        assert_eq!(cleaned.rows()[0][1], CellValue::from("ok"));
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let ds = parse("a,b\n1,x\n2,y\n1,x\n3,z\n2,y\n", "dups.csv").unwrap();
        let (cleaned, removed) = DataCleaner::default().remove_duplicates(&ds);
        assert_eq!(removed, 2);
        let firsts: Vec<f64> = cleaned.rows().iter().filter_map(|r| r[0].as_number()).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_apply_reports() {
        let ds = parse("a\n1\n1\n2\n", "r.csv").unwrap();
        let (cleaned, report) = DataCleaner::default().apply(CleaningOperation::RemoveDuplicates, &ds);
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(report.rows_before, 3);
        assert_eq!(report.rows_after, 2);
        assert_eq!(report.rows_removed, 1);
    }
}
