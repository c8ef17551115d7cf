//! Log Anomaly Pipeline - Main Entry Point
//!
//! Trains the outlier model on the known-normal sample file, connects to the
//! log queue, and serves queue scans over HTTP.

use anyhow::{Context, Result};
use log_anomaly_pipeline::{
    config::AppConfig,
    feature_extractor::FeatureExtractor,
    metrics::{AnalyzerMetrics, MetricsReporter},
    queue::LogQueue,
    server::{self, AppState},
    trainer::Trainer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("log_anomaly_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Log Anomaly Pipeline");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");
    info!(
        "Detection threshold: {:.2}, trees: {}, subsample: {}",
        config.detection.threshold, config.detection.num_trees, config.detection.sample_size
    );

    // Initialize metrics
    let metrics = Arc::new(AnalyzerMetrics::new());

    // Initialize components
    let extractor = Arc::new(FeatureExtractor::new());
    info!(
        "Feature extractor initialized ({} features)",
        extractor.feature_count()
    );

    // One-shot training pass; any failure here is fatal at startup
    let trainer = Trainer::new(config.detection.clone());
    let detector = Arc::new(
        trainer
            .train_from_file(&config.training.sample_path)
            .context("model training failed")?,
    );
    info!(
        model = %detector.model_name(),
        sample_path = %config.training.sample_path,
        "outlier model ready"
    );

    // Connect to the log queue
    let queue = LogQueue::connect(&config.queue.url, &config.queue.key).await?;

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Build router and serve
    let state = AppState {
        detector,
        extractor,
        queue,
        metrics,
    };
    let app = server::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server bind address")?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
