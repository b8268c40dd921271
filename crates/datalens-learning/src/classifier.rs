//! Classification strategy interface.
//!
//! A [`Classifier`] is a pluggable strategy (a decision tree, a
//! nearest-neighbor vote, ...) that trains on [`LabeledData`] and returns a
//! [`TrainedClassifier`] able to label new feature vectors. The crate ships
//! no strategies of its own.

use crate::error::Result;
use crate::types::LabeledData;

/// A classification strategy.
///
/// Implementations must be `Send + Sync` so a registry can be shared
/// between threads.
pub trait Classifier: Send + Sync {
    /// Name the strategy is registered under.
    fn name(&self) -> &str;

    /// Fit the strategy to `data`.
    ///
    /// Return [`LearningError::TrainingFailed`](crate::LearningError::TrainingFailed)
    /// when the data cannot be fitted.
    fn train(&self, data: &LabeledData) -> Result<Box<dyn TrainedClassifier>>;
}

/// A fitted model produced by [`Classifier::train`].
pub trait TrainedClassifier: Send + Sync {
    /// Label one feature vector, ordered like
    /// [`LabeledData::feature_names`].
    fn predict(&self, features: &[f64]) -> String;

    /// Label every row.
    fn predict_all(&self, rows: &[Vec<f64>]) -> Vec<String> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

static_assertions::assert_obj_safe!(Classifier, TrainedClassifier);
