//! Common types used throughout the datalens-learning crate.
//!
//! - [`LabeledData`]: feature matrix and class labels extracted from a dataset
//! - [`ClassificationMetrics`]: evaluation metrics computed from predictions
//! - [`ClassificationOutcome`]: result of a registry run

use std::collections::BTreeSet;

use datalens_processing::profiler::numeric_values;
use datalens_processing::utils::round3;
use datalens_processing::{ColumnClassifier, Dataset, ProcessingError};
use serde::{Deserialize, Serialize};

use crate::error::{LearningError, Result};

// ============================================================================
// Training data
// ============================================================================

/// Numeric feature rows paired with their class labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledData {
    /// Feature column names, in the order of each row's values.
    pub feature_names: Vec<String>,
    /// One feature vector per row.
    pub features: Vec<Vec<f64>>,
    /// One class label per row.
    pub labels: Vec<String>,
}

impl LabeledData {
    /// Extract features and labels from `dataset`.
    ///
    /// An empty `feature_columns` selects every numeric column except the
    /// target. Labels are the target cells' text form; a row with a missing
    /// label is rejected.
    pub fn from_dataset(
        dataset: &Dataset,
        target_column: &str,
        feature_columns: &[String],
    ) -> Result<Self> {
        let target = dataset
            .column_index(target_column)
            .ok_or_else(|| LearningError::TargetNotFound(target_column.to_string()))?;

        let feature_indices: Vec<usize> = if feature_columns.is_empty() {
            ColumnClassifier::numeric_columns(dataset)
                .into_iter()
                .filter(|&i| i != target)
                .collect()
        } else {
            feature_columns
                .iter()
                .map(|name| {
                    dataset
                        .column_index(name)
                        .ok_or_else(|| ProcessingError::ColumnNotFound(name.clone()).into())
                })
                .collect::<Result<_>>()?
        };

        if feature_indices.is_empty() {
            return Err(LearningError::InvalidData(
                "no numeric feature columns besides the target".to_string(),
            ));
        }

        let columns: Vec<Vec<f64>> = feature_indices
            .iter()
            .map(|&i| numeric_values(dataset, i))
            .collect::<std::result::Result<_, _>>()?;

        let mut labels = Vec::with_capacity(dataset.row_count());
        for (row_index, row) in dataset.rows().iter().enumerate() {
            let cell = &row[target];
            if cell.is_missing(&[]) {
                return Err(LearningError::InvalidData(format!(
                    "row {} has no value in target column '{}'",
                    row_index + 1,
                    target_column
                )));
            }
            labels.push(cell.to_string());
        }

        let features = (0..dataset.row_count())
            .map(|r| columns.iter().map(|column| column[r]).collect())
            .collect();

        Ok(Self {
            feature_names: feature_indices
                .iter()
                .map(|&i| dataset.headers()[i].clone())
                .collect(),
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Split off the last `test_rows` rows as the evaluation set.
    pub fn split_tail(&self, test_rows: usize) -> Result<(LabeledData, LabeledData)> {
        if test_rows == 0 || test_rows >= self.len() {
            return Err(LearningError::InvalidData(format!(
                "cannot hold out {} of {} rows and still train",
                test_rows,
                self.len()
            )));
        }
        let cut = self.len() - test_rows;
        let part = |range: std::ops::Range<usize>| LabeledData {
            feature_names: self.feature_names.clone(),
            features: self.features[range.clone()].to_vec(),
            labels: self.labels[range].to_vec(),
        };
        Ok((part(0..cut), part(cut..self.len())))
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Classification metrics computed from actual and predicted labels.
///
/// Precision, recall and F1 are macro averages over every label seen in
/// either sequence; a class that is never predicted has precision 0. All
/// values are rounded to three decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    /// Fraction of correct predictions. Range: [0.0, 1.0].
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Sorted class labels indexing the confusion matrix.
    pub labels: Vec<String>,
    /// `confusion_matrix[i][j]`: rows with actual label `i` predicted as `j`.
    pub confusion_matrix: Vec<Vec<usize>>,
}

impl ClassificationMetrics {
    pub fn from_predictions(actual: &[String], predicted: &[String]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(LearningError::LengthMismatch {
                actual: actual.len(),
                predicted: predicted.len(),
            });
        }
        if actual.is_empty() {
            return Err(LearningError::InvalidData(
                "no predictions to evaluate".to_string(),
            ));
        }

        let labels: Vec<String> = actual
            .iter()
            .chain(predicted)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let position = |label: &String| labels.binary_search(label).unwrap_or_default();

        let k = labels.len();
        let mut confusion_matrix = vec![vec![0usize; k]; k];
        for (a, p) in actual.iter().zip(predicted) {
            confusion_matrix[position(a)][position(p)] += 1;
        }

        let correct: usize = (0..k).map(|i| confusion_matrix[i][i]).sum();
        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut f1_sum = 0.0;
        for i in 0..k {
            let tp = confusion_matrix[i][i] as f64;
            let predicted_i: usize = (0..k).map(|r| confusion_matrix[r][i]).sum();
            let actual_i: usize = confusion_matrix[i].iter().sum();
            let precision = ratio(tp, predicted_i as f64);
            let recall = ratio(tp, actual_i as f64);
            precision_sum += precision;
            recall_sum += recall;
            f1_sum += ratio(2.0 * precision * recall, precision + recall);
        }

        Ok(Self {
            accuracy: round3(correct as f64 / actual.len() as f64),
            precision: round3(precision_sum / k as f64),
            recall: round3(recall_sum / k as f64),
            f1_score: round3(f1_sum / k as f64),
            labels,
            confusion_matrix,
        })
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Result of running one strategy through a
/// [`ClassifierRegistry`](crate::ClassifierRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub classifier: String,
    pub feature_names: Vec<String>,
    pub train_rows: usize,
    /// Predictions for the held-out rows, in row order.
    pub predictions: Vec<String>,
    pub metrics: ClassificationMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalens_processing::parse;
    use pretty_assertions::assert_eq;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_metrics_perfect() {
        let y = labels(&["a", "b", "a"]);
        let m = ClassificationMetrics::from_predictions(&y, &y).unwrap();
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.f1_score, 1.0);
        assert_eq!(m.confusion_matrix, vec![vec![2, 0], vec![0, 1]]);
    }

    #[test]
    fn test_metrics_mixed() {
        let actual = labels(&["a", "a", "b", "b"]);
        let predicted = labels(&["a", "b", "b", "b"]);
        let m = ClassificationMetrics::from_predictions(&actual, &predicted).unwrap();
        assert_eq!(m.labels, vec!["a", "b"]);
        assert_eq!(m.confusion_matrix, vec![vec![1, 1], vec![0, 2]]);
        assert_eq!(m.accuracy, 0.75);
        // precision a = 1, b = 2/3; recall a = 1/2, b = 1
        assert_eq!(m.precision, 0.833);
        assert_eq!(m.recall, 0.75);
        // f1 a = 2/3, b = 0.8
        assert_eq!(m.f1_score, 0.733);
    }

    #[test]
    fn test_metrics_never_predicted_class() {
        let actual = labels(&["a", "b"]);
        let predicted = labels(&["a", "a"]);
        let m = ClassificationMetrics::from_predictions(&actual, &predicted).unwrap();
        // precision a = 1/2, b = 0
        assert_eq!(m.precision, 0.25);
    }

    #[test]
    fn test_metrics_errors() {
        assert!(matches!(
            ClassificationMetrics::from_predictions(&labels(&["a"]), &[]),
            Err(LearningError::LengthMismatch {
                actual: 1,
                predicted: 0
            })
        ));
        assert!(matches!(
            ClassificationMetrics::from_predictions(&[], &[]),
            Err(LearningError::InvalidData(_))
        ));
    }

    #[test]
    fn test_labeled_data_defaults_to_numeric_features() {
        let ds = parse("w,h,city,kind\n1,2,Oslo,x\n3,4,Lima,y\n", "t.csv").unwrap();
        let data = LabeledData::from_dataset(&ds, "kind", &[]).unwrap();
        assert_eq!(data.feature_names, vec!["w", "h"]);
        assert_eq!(data.features, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(data.labels, vec!["x", "y"]);
    }

    #[test]
    fn test_labeled_data_errors() {
        let ds = parse("w,city,kind\n1,Oslo,x\n3,Lima,\n", "t.csv").unwrap();
        assert!(matches!(
            LabeledData::from_dataset(&ds, "nope", &[]),
            Err(LearningError::TargetNotFound(_))
        ));
        assert!(matches!(
            LabeledData::from_dataset(&ds, "kind", &["city".to_string()]),
            Err(LearningError::Processing(ProcessingError::ColumnNotNumeric(_)))
        ));
        assert!(matches!(
            LabeledData::from_dataset(&ds, "kind", &[]),
            Err(LearningError::InvalidData(_))
        ));
    }

    #[test]
    fn test_split_tail() {
        let ds = parse("v,k\n1,a\n2,b\n3,a\n4,b\n", "t.csv").unwrap();
        let data = LabeledData::from_dataset(&ds, "k", &[]).unwrap();
        let (train, test) = data.split_tail(1).unwrap();
        assert_eq!(train.len(), 3);
        assert_eq!(test.labels, vec!["b"]);
        assert!(data.split_tail(4).is_err());
    }
}
