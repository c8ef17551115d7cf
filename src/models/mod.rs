//! Outlier-detection models
//!
//! The pipeline trains a single model at startup and holds it immutable for
//! the process lifetime.

pub mod detector;
pub mod isolation_forest;

pub use detector::{AnomalyDetector, Prediction};
pub use isolation_forest::IsolationForest;

use serde::{Deserialize, Serialize};

/// Trait for outlier-detection models trained on presumed-normal data.
pub trait OutlierModel: Send + Sync {
    /// Fit the model against normal feature vectors.
    fn fit(&mut self, data: &[Vec<f64>]);

    /// Score a sample in [0, 1]; higher means more anomalous.
    fn score(&self, sample: &[f64]) -> f64;

    /// Whether a sample scores past the model's anomaly threshold.
    fn is_anomalous(&self, sample: &[f64]) -> bool;

    /// Whether the model has been fitted.
    fn is_trained(&self) -> bool;

    /// Model name for logging.
    fn name(&self) -> &str;
}

/// Isolation forest hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Anomaly score threshold (scores at or above are anomalous)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Number of trees in the forest
    #[serde(default = "default_num_trees")]
    pub num_trees: usize,
    /// Subsample size drawn per tree
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Random seed for reproducible fits
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_threshold() -> f64 {
    0.6
}

fn default_num_trees() -> usize {
    100
}

fn default_sample_size() -> usize {
    256
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            num_trees: default_num_trees(),
            sample_size: default_sample_size(),
            seed: None,
        }
    }
}
