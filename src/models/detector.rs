//! Anomaly detector wrapping the fitted model

use serde::{Deserialize, Serialize};

use super::{IsolationForest, OutlierModel};

/// Per-vector label produced by a batch prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Normal,
    Anomalous,
}

impl Prediction {
    pub fn is_anomalous(self) -> bool {
        matches!(self, Prediction::Anomalous)
    }
}

/// Fitted outlier model held in process-wide state for the server lifetime.
///
/// Immutable after training; there is no versioning, reload, or
/// invalidation.
pub struct AnomalyDetector {
    model: IsolationForest,
}

impl AnomalyDetector {
    /// Wrap a fitted model.
    pub fn new(model: IsolationForest) -> Self {
        Self { model }
    }

    /// Anomaly score for a single feature vector.
    pub fn score(&self, features: &[f64]) -> f64 {
        self.model.score(features)
    }

    /// Label a single feature vector.
    pub fn predict(&self, features: &[f64]) -> Prediction {
        if self.model.is_anomalous(features) {
            Prediction::Anomalous
        } else {
            Prediction::Normal
        }
    }

    /// Label a batch of feature vectors.
    ///
    /// Output order matches input order; callers correlate predictions back
    /// to their source records by position.
    pub fn predict_batch(&self, batch: &[Vec<f64>]) -> Vec<Prediction> {
        batch.iter().map(|v| self.predict(v)).collect()
    }

    /// Name of the underlying model, for logging.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Anomaly score threshold the labels are derived from.
    pub fn threshold(&self) -> f64 {
        self.model.threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForestConfig;

    fn trained_detector() -> AnomalyDetector {
        let mut forest = IsolationForest::new(ForestConfig {
            seed: Some(7),
            ..ForestConfig::default()
        });
        let data: Vec<Vec<f64>> = (0..200)
            .map(|i| {
                let t = (i % 50) as f64;
                vec![1.0 + t * 0.01, 0.01 + (i % 5) as f64 * 0.005, 40.0 + t]
            })
            .collect();
        forest.fit(&data);
        AnomalyDetector::new(forest)
    }

    #[test]
    fn test_prediction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Prediction::Normal).unwrap(), "\"normal\"");
        assert_eq!(
            serde_json::to_string(&Prediction::Anomalous).unwrap(),
            "\"anomalous\""
        );
    }

    #[test]
    fn test_batch_order_matches_input() {
        let detector = trained_detector();
        let batch = vec![
            vec![1.2, 0.01, 60.0],
            vec![999.0, 0.9, 5000.0],
            vec![1.1, 0.02, 55.0],
        ];

        let predictions = detector.predict_batch(&batch);
        assert_eq!(
            predictions,
            vec![
                Prediction::Normal,
                Prediction::Anomalous,
                Prediction::Normal
            ]
        );
    }

    #[test]
    fn test_empty_batch() {
        let detector = trained_detector();
        assert!(detector.predict_batch(&[]).is_empty());
    }
}
