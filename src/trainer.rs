//! One-shot model training at process startup.
//!
//! Reads the known-normal sample file, builds feature vectors with the same
//! extractor the scorer uses, and fits the outlier model. Any failure here
//! is fatal: the error propagates out of `main` and the process does not
//! start.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::feature_extractor::FeatureExtractor;
use crate::models::{AnomalyDetector, ForestConfig, IsolationForest, OutlierModel};
use crate::types::record::LogRecord;

/// Fits the outlier model against a fixed set of known-normal records.
pub struct Trainer {
    config: ForestConfig,
    extractor: FeatureExtractor,
}

impl Trainer {
    /// Create a trainer with the given model hyperparameters.
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Train from a JSON file containing an array of normal records.
    pub fn train_from_file<P: AsRef<Path>>(&self, path: P) -> Result<AnomalyDetector> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open training sample file {}", path.display()))?;
        let records: Vec<LogRecord> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| {
                format!(
                    "training sample file {} is not a JSON array of records",
                    path.display()
                )
            })?;

        info!(
            path = %path.display(),
            samples = records.len(),
            "loaded training sample file"
        );

        self.train_from_records(&records)
    }

    /// Train from already-parsed normal records.
    pub fn train_from_records(&self, records: &[LogRecord]) -> Result<AnomalyDetector> {
        if records.is_empty() {
            bail!("training sample set is empty");
        }

        let vectors = self
            .extractor
            .extract_batch(records)
            .context("failed to build training feature vectors")?;

        let mut forest = IsolationForest::new(self.config.clone());
        forest.fit(&vectors);

        info!(
            samples = vectors.len(),
            trees = forest.tree_count(),
            threshold = forest.threshold(),
            "outlier model fitted"
        );

        Ok(AnomalyDetector::new(forest))
    }
}
