//! Test Log Producer
//!
//! Generates synthetic log records and pushes them onto the queue for
//! pipeline testing.

use rand::Rng;
use redis::AsyncCommands;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Log record generator for testing
struct RecordGenerator {
    rng: rand::rngs::ThreadRng,
    record_counter: u64,
}

impl RecordGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            record_counter: 0,
        }
    }

    /// Generate a normal-shaped log record
    fn generate_normal(&mut self) -> Value {
        self.record_counter += 1;

        json!({
            "record_id": format!("log_{:010}", self.record_counter),
            "service": self.random_choice(&["api", "auth", "billing", "search"]),
            "host": format!("node-{:02}", self.rng.gen_range(1..20)),
            "metric": self.rng.gen_range(0.8..1.4),
            "error_rate": self.rng.gen_range(0.0..0.05),
            "latency": self.rng.gen_range(30.0..90.0),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Generate an anomalous log record
    fn generate_anomalous(&mut self) -> Value {
        self.record_counter += 1;

        json!({
            "record_id": format!("log_{:010}", self.record_counter),
            "service": self.random_choice(&["api", "auth"]),
            "host": format!("node-{:02}", self.rng.gen_range(1..20)),
            "metric": self.rng.gen_range(200.0..1500.0),   // Way outside baseline
            "error_rate": self.rng.gen_range(0.5..1.0),    // Mostly failing
            "latency": self.rng.gen_range(2000.0..10000.0), // Severe slowdown
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("log_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Log Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let queue_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("redis://127.0.0.1:6379");
    let key = args.get(2).map(|s| s.as_str()).unwrap_or("logs");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let anomaly_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        queue_url = %queue_url,
        key = %key,
        count = count,
        anomaly_rate = anomaly_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to the queue
    let client = redis::Client::open(queue_url)?;
    let mut conn = match client.get_connection_manager().await {
        Ok(c) => {
            info!("Connected to queue");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to queue. Running in dry-run mode.");
            return run_dry_mode(count, anomaly_rate, delay_ms).await;
        }
    };

    // Generate and push records
    let mut generator = RecordGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to push {} records...", count);

    let mut normal_count = 0;
    let mut anomalous_count = 0;

    for i in 0..count {
        let record = if rng.gen_bool(anomaly_rate) {
            anomalous_count += 1;
            generator.generate_anomalous()
        } else {
            normal_count += 1;
            generator.generate_normal()
        };

        let payload = serde_json::to_string(&record)?;
        conn.lpush::<_, _, ()>(key, payload).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Pushed {}/{} records ({} normal, {} anomalous)",
                i + 1,
                count,
                normal_count,
                anomalous_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Pushed {} records ({} normal, {} anomalous)",
        count, normal_count, anomalous_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, anomaly_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no queue connection)");

    let mut generator = RecordGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let record = if rng.gen_bool(anomaly_rate) {
            generator.generate_anomalous()
        } else {
            generator.generate_normal()
        };

        let json = serde_json::to_string_pretty(&record)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample record {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
