//! HTTP surface and the scoring pass.
//!
//! `GET /analyze` runs one synchronous pass over the current queue contents:
//! fetch everything buffered, build one feature vector per record, run a
//! single batch prediction, and return the records labelled anomalous in
//! their original queue order.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::feature_extractor::FeatureExtractor;
use crate::metrics::AnalyzerMetrics;
use crate::models::AnomalyDetector;
use crate::queue::LogQueue;
use crate::types::record::LogRecord;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<AnomalyDetector>,
    pub extractor: Arc<FeatureExtractor>,
    pub queue: LogQueue,
    pub metrics: Arc<AnalyzerMetrics>,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", get(analyze))
        .route("/ingest", post(ingest))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Response body of `GET /analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub anomalies: Vec<LogRecord>,
}

async fn analyze(State(state): State<AppState>) -> AppResult<Json<AnalyzeResponse>> {
    let started = Instant::now();

    let entries = state.queue.fetch_all().await?;
    let records = parse_entries(&entries)?;
    let anomalies = score_records(&state.extractor, &state.detector, records)?;

    state
        .metrics
        .record_scan(entries.len(), anomalies.len(), started.elapsed());

    info!(
        scanned = entries.len(),
        flagged = anomalies.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "queue scan complete"
    );

    Ok(Json(AnalyzeResponse { anomalies }))
}

/// Parse raw queue entries into records.
///
/// A single malformed entry fails the whole scan; there is no per-record
/// isolation.
fn parse_entries(entries: &[String]) -> AppResult<Vec<LogRecord>> {
    entries
        .iter()
        .map(|entry| serde_json::from_str::<LogRecord>(entry).map_err(AppError::from))
        .collect()
}

/// The scoring pass: one batch prediction over all records, predictions
/// zipped back to their source records by position.
pub fn score_records(
    extractor: &FeatureExtractor,
    detector: &AnomalyDetector,
    records: Vec<LogRecord>,
) -> AppResult<Vec<LogRecord>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let vectors = extractor
        .extract_batch(&records)
        .map_err(|e| AppError::MalformedRecord(format!("{e:#}")))?;
    let predictions = detector.predict_batch(&vectors);

    Ok(records
        .into_iter()
        .zip(predictions)
        .filter(|(_, prediction)| prediction.is_anomalous())
        .map(|(record, _)| record)
        .collect())
}

async fn ingest(
    State(state): State<AppState>,
    Json(record): Json<LogRecord>,
) -> AppResult<&'static str> {
    let payload = serde_json::to_string(&record)?;
    state.queue.push(payload).await?;
    Ok("ok")
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForestConfig, IsolationForest};
    use crate::trainer::Trainer;
    use serde_json::json;

    fn record(value: serde_json::Value) -> LogRecord {
        serde_json::from_value(value).unwrap()
    }

    fn normal_records() -> Vec<LogRecord> {
        (0..200)
            .map(|i| {
                let t = (i % 40) as f64;
                record(json!({
                    "metric": 0.9 + t * 0.01,
                    "error_rate": 0.01 + (i % 5) as f64 * 0.005,
                    "latency": 35.0 + t * 1.5,
                }))
            })
            .collect()
    }

    fn trained_detector() -> AnomalyDetector {
        let trainer = Trainer::new(ForestConfig {
            seed: Some(42),
            ..ForestConfig::default()
        });
        trainer.train_from_records(&normal_records()).unwrap()
    }

    #[test]
    fn test_empty_queue_yields_empty_output() {
        let detector = trained_detector();
        let extractor = FeatureExtractor::new();

        let anomalies = score_records(&extractor, &detector, Vec::new()).unwrap();
        assert!(anomalies.is_empty());

        let response = AnalyzeResponse { anomalies };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"anomalies":[]}"#
        );
    }

    #[test]
    fn test_only_outliers_flagged_in_original_order() {
        let detector = trained_detector();
        let extractor = FeatureExtractor::new();

        let normal_a = record(json!({ "metric": 1.0, "error_rate": 0.01, "latency": 50 }));
        let extreme_a = record(json!({ "metric": 999, "error_rate": 0.9, "latency": 5000 }));
        let normal_b = record(json!({ "metric": 1.1, "error_rate": 0.02, "latency": 60 }));
        let extreme_b = record(json!({ "metric": 500, "error_rate": 0.8, "latency": 9000 }));

        let queue = vec![
            normal_a.clone(),
            extreme_a.clone(),
            normal_b.clone(),
            extreme_b.clone(),
        ];

        let anomalies = score_records(&extractor, &detector, queue).unwrap();
        assert_eq!(anomalies, vec![extreme_a, extreme_b]);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let detector = trained_detector();
        let extractor = FeatureExtractor::new();

        let queue = vec![
            record(json!({ "metric": 1.0, "error_rate": 0.01, "latency": 50 })),
            record(json!({ "metric": 999, "error_rate": 0.9, "latency": 5000 })),
        ];

        let first = score_records(&extractor, &detector, queue.clone()).unwrap();
        let second = score_records(&extractor, &detector, queue).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_missing_field_is_scored_not_rejected() {
        let detector = trained_detector();
        let extractor = FeatureExtractor::new();

        // Missing fields substitute zero, which still lands near the normal
        // cluster boundary rather than failing the request.
        let queue = vec![record(json!({ "metric": 1.0 }))];
        assert!(score_records(&extractor, &detector, queue).is_ok());
    }

    #[test]
    fn test_malformed_entry_fails_whole_scan() {
        let entries = vec![
            r#"{"metric": 1.0}"#.to_string(),
            "not json at all".to_string(),
        ];
        assert!(parse_entries(&entries).is_err());
    }

    #[test]
    fn test_parse_entries_preserves_order() {
        let entries = vec![
            r#"{"metric": 1}"#.to_string(),
            r#"{"metric": 2}"#.to_string(),
        ];
        let records = parse_entries(&entries).unwrap();
        assert_eq!(records[0].numeric_field("metric").unwrap(), 1.0);
        assert_eq!(records[1].numeric_field("metric").unwrap(), 2.0);
    }

    #[test]
    fn test_untrained_model_flags_nothing() {
        let detector = AnomalyDetector::new(IsolationForest::with_defaults());
        assert!(!detector.predict(&[999.0, 0.9, 5000.0]).is_anomalous());
    }
}
