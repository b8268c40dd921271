//! datalens-learning: pluggable classification over datalens datasets.
//!
//! This crate is the capability interface behind the classification view.
//! It defines what a classification strategy is, how strategies are looked
//! up by name, and how their predictions are scored. It deliberately ships
//! no strategies: a [`ClassifierRegistry`] starts empty, and every run
//! reports metrics computed from real predictions.
//!
//! # Features
//!
//! - **Strategy interface**: [`Classifier`] trains on numeric features and
//!   returns a [`TrainedClassifier`]
//! - **Registry**: strategies registered by name, with a typed error for
//!   unknown names
//! - **Evaluation**: accuracy, macro precision/recall/F1 and a confusion
//!   matrix from any pair of label sequences
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datalens_learning::{ClassificationConfig, ClassifierRegistry};
//! use datalens_processing::Workbench;
//!
//! let bench = Workbench::default();
//! bench.load_file("iris.csv")?;
//!
//! let mut registry = ClassifierRegistry::new();
//! registry.register(MyNearestNeighbor::new(3));
//!
//! let config = ClassificationConfig::builder()
//!     .target_column("species")
//!     .classifier("nearest_neighbor")
//!     .build()?;
//!
//! let outcome = registry.run_current(bench.store(), &config)?;
//! println!("accuracy: {:.3}", outcome.metrics.accuracy);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use classifier::{Classifier, TrainedClassifier};
pub use config::{ClassificationConfig, ClassificationConfigBuilder};
pub use error::{LearningError, Result};
pub use registry::ClassifierRegistry;
pub use types::{ClassificationMetrics, ClassificationOutcome, LabeledData};
