//! Registry of named classification strategies.

use std::collections::BTreeMap;
use std::sync::Arc;

use datalens_processing::{Dataset, DatasetStore, ProcessingError};
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::config::ClassificationConfig;
use crate::error::{LearningError, Result};
use crate::types::{ClassificationMetrics, ClassificationOutcome, LabeledData};

/// Named [`Classifier`] strategies.
///
/// A new registry is empty: there is no default strategy, and asking for an
/// unregistered name fails with [`LearningError::UnknownClassifier`].
#[derive(Clone, Default)]
pub struct ClassifierRegistry {
    strategies: BTreeMap<String, Arc<dyn Classifier>>,
}

impl std::fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `classifier` under its own name, replacing any strategy
    /// already registered with that name.
    pub fn register<C>(&mut self, classifier: C) -> &mut Self
    where
        C: Classifier + 'static,
    {
        let name = classifier.name().to_string();
        debug!("Registering classifier '{}'", name);
        self.strategies.insert(name, Arc::new(classifier));
        self
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Classifier>> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| LearningError::UnknownClassifier(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Train the configured strategy on the leading rows of `dataset` and
    /// evaluate it on the held-out tail.
    pub fn run(
        &self,
        dataset: &Dataset,
        config: &ClassificationConfig,
    ) -> Result<ClassificationOutcome> {
        let classifier = self.get(&config.classifier)?;
        let data =
            LabeledData::from_dataset(dataset, &config.target_column, &config.feature_columns)?;
        let (train, test) = data.split_tail(config.test_rows(data.len()))?;

        info!(
            "Training '{}' on {} rows ({} features), evaluating on {}",
            config.classifier,
            train.len(),
            train.feature_names.len(),
            test.len()
        );

        let model = classifier.train(&train)?;
        let predictions = model.predict_all(&test.features);
        let metrics = ClassificationMetrics::from_predictions(&test.labels, &predictions)?;

        info!(
            "'{}' accuracy {:.3}, macro F1 {:.3}",
            config.classifier, metrics.accuracy, metrics.f1_score
        );

        Ok(ClassificationOutcome {
            classifier: config.classifier.clone(),
            feature_names: train.feature_names,
            train_rows: train.labels.len(),
            predictions,
            metrics,
        })
    }

    /// [`run`](Self::run) against the store's current dataset.
    pub fn run_current(
        &self,
        store: &DatasetStore,
        config: &ClassificationConfig,
    ) -> Result<ClassificationOutcome> {
        let dataset = store.get().ok_or(ProcessingError::NoDataLoaded)?;
        self.run(&dataset, config)
    }
}

static_assertions::assert_impl_all!(ClassifierRegistry: Send, Sync);
