//! Scan metrics and statistics tracking for the log anomaly pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for queue scans
pub struct AnalyzerMetrics {
    /// Total analyze requests served
    pub scans_served: AtomicU64,
    /// Total records scored across all scans
    pub records_scored: AtomicU64,
    /// Total records flagged anomalous
    pub anomalies_flagged: AtomicU64,
    /// Scan durations (in microseconds)
    scan_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl AnalyzerMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            scans_served: AtomicU64::new(0),
            records_scored: AtomicU64::new(0),
            anomalies_flagged: AtomicU64::new(0),
            scan_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record one completed queue scan
    pub fn record_scan(&self, records: usize, anomalies: usize, elapsed: Duration) {
        self.scans_served.fetch_add(1, Ordering::Relaxed);
        self.records_scored
            .fetch_add(records as u64, Ordering::Relaxed);
        self.anomalies_flagged
            .fetch_add(anomalies as u64, Ordering::Relaxed);

        if let Ok(mut times) = self.scan_times.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only the recent window for memory efficiency
            if times.len() > 10_000 {
                times.drain(0..5_000);
            }
        }
    }

    /// Get scan duration statistics
    pub fn get_scan_stats(&self) -> ScanStats {
        let times = self.scan_times.read().unwrap();
        if times.is_empty() {
            return ScanStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ScanStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Fraction of scored records flagged anomalous
    pub fn anomaly_rate(&self) -> f64 {
        let scored = self.records_scored.load(Ordering::Relaxed);
        if scored == 0 {
            return 0.0;
        }
        self.anomalies_flagged.load(Ordering::Relaxed) as f64 / scored as f64
    }

    /// Get current throughput (scans per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.scans_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scans = self.scans_served.load(Ordering::Relaxed);
        let scored = self.records_scored.load(Ordering::Relaxed);
        let flagged = self.anomalies_flagged.load(Ordering::Relaxed);
        let stats = self.get_scan_stats();

        info!(
            scans = scans,
            records_scored = scored,
            anomalies_flagged = flagged,
            anomaly_rate = format!("{:.1}%", self.anomaly_rate() * 100.0),
            "pipeline metrics summary"
        );
        info!(
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            max_us = stats.max_us,
            "scan latency (us)"
        );
    }
}

impl Default for AnalyzerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan duration statistics
#[derive(Debug, Default)]
pub struct ScanStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<AnalyzerMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<AnalyzerMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = AnalyzerMetrics::new();

        metrics.record_scan(10, 2, Duration::from_micros(100));
        metrics.record_scan(5, 0, Duration::from_micros(200));

        assert_eq!(metrics.scans_served.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.records_scored.load(Ordering::Relaxed), 15);
        assert_eq!(metrics.anomalies_flagged.load(Ordering::Relaxed), 2);

        let stats = metrics.get_scan_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max_us, 200);
    }

    #[test]
    fn test_anomaly_rate() {
        let metrics = AnalyzerMetrics::new();
        assert_eq!(metrics.anomaly_rate(), 0.0);

        metrics.record_scan(8, 2, Duration::from_micros(50));
        assert!((metrics.anomaly_rate() - 0.25).abs() < f64::EPSILON);
    }
}
