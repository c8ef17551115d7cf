//! Feature extraction for log record scoring.
//!
//! Maps free-form log records onto the fixed-length numeric vectors the
//! outlier model was trained on. The field order is part of the model
//! contract and is not configurable.

use anyhow::Result;

use crate::types::record::LogRecord;

/// Fields read from each record, in model input order.
pub const FEATURE_NAMES: &[&str] = &["metric", "error_rate", "latency"];

/// Feature extractor that transforms log records into model input vectors.
///
/// The same extractor runs at training time and at scoring time, so the
/// coercion rules (absent field reads as zero, numeric strings parse,
/// anything else is malformed) apply identically to both.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the feature vector for a single record.
    pub fn extract(&self, record: &LogRecord) -> Result<Vec<f64>> {
        FEATURE_NAMES
            .iter()
            .map(|name| record.numeric_field(name))
            .collect()
    }

    /// Extract feature vectors for a batch of records, preserving order.
    ///
    /// One malformed record fails the whole batch; there is no per-record
    /// isolation.
    pub fn extract_batch(&self, records: &[LogRecord]) -> Result<Vec<Vec<f64>>> {
        records.iter().map(|r| self.extract(r)).collect()
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    /// Get feature names in extraction order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> LogRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_feature_order_is_fixed() {
        let extractor = FeatureExtractor::new();
        let rec = record(json!({
            "latency": 50.0,
            "metric": 1.0,
            "error_rate": 0.01,
            "service": "api",
        }));

        let features = extractor.extract(&rec).unwrap();
        assert_eq!(features, vec![1.0, 0.01, 50.0]);
    }

    #[test]
    fn test_missing_field_substitutes_zero() {
        let extractor = FeatureExtractor::new();
        let rec = record(json!({ "metric": 2.0 }));

        let features = extractor.extract(&rec).unwrap();
        assert_eq!(features, vec![2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_malformed_value_fails_batch() {
        let extractor = FeatureExtractor::new();
        let records = vec![
            record(json!({ "metric": 1.0, "error_rate": 0.0, "latency": 10 })),
            record(json!({ "metric": { "nested": true } })),
        ];

        assert!(extractor.extract_batch(&records).is_err());
    }

    #[test]
    fn test_batch_preserves_order() {
        let extractor = FeatureExtractor::new();
        let records = vec![
            record(json!({ "metric": 1.0 })),
            record(json!({ "metric": 2.0 })),
            record(json!({ "metric": 3.0 })),
        ];

        let batch = extractor.extract_batch(&records).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0][0], 1.0);
        assert_eq!(batch[2][0], 3.0);
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 3);
        assert_eq!(extractor.feature_names(), FEATURE_NAMES);
    }
}
