//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Track the per-route request counter, the global exception counter,
//!   and the per-route processing-time histogram
//! - Mirror every update into the `metrics` facade so the Prometheus
//!   endpoint sees the same series
//! - Provide point-in-time snapshots for the console exporter and tests
//!
//! # Metrics
//! - `catalog_requests_total` (counter): requests by route
//! - `catalog_exceptions_total` (counter): handled faults, unlabeled
//! - `catalog_processing_time_ms` (histogram): latency by route
//!
//! # Design Decisions
//! - The sink is an explicitly constructed instance handed to the server,
//!   never a module-level singleton
//! - One canonical `{route: <name>}` label shape at every call site
//! - Updates are lock-free (atomics behind dashmap shards)

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use serde::Serialize;

/// Summary statistics for a histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

/// Snapshot of all aggregates at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Request counts keyed by route.
    pub requests: Vec<(String, u64)>,
    /// Total handled faults.
    pub exceptions: u64,
    /// Processing-time summaries keyed by route, in milliseconds.
    pub processing_time_ms: Vec<(String, HistogramSummary)>,
}

/// Internal histogram data with atomic fields (f64 bits stored as u64).
struct HistogramData {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl HistogramData {
    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(f64::to_bits(0.0)),
            min: AtomicU64::new(f64::to_bits(f64::MAX)),
            max: AtomicU64::new(f64::to_bits(f64::MIN)),
        }
    }

    fn record(&self, value: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        Self::update_f64(&self.sum, |current| current + value);
        Self::update_f64(&self.min, |current| current.min(value));
        Self::update_f64(&self.max, |current| current.max(value));
    }

    fn update_f64(atomic: &AtomicU64, f: impl Fn(f64) -> f64) {
        loop {
            let current = atomic.load(Ordering::Relaxed);
            let new = f64::to_bits(f(f64::from_bits(current)));
            if new == current {
                break;
            }
            if atomic
                .compare_exchange_weak(current, new, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        }
    }

    fn to_summary(&self) -> HistogramSummary {
        let count = self.count.load(Ordering::Relaxed);
        HistogramSummary {
            count,
            sum: f64::from_bits(self.sum.load(Ordering::Relaxed)),
            min: if count == 0 {
                0.0
            } else {
                f64::from_bits(self.min.load(Ordering::Relaxed))
            },
            max: if count == 0 {
                0.0
            } else {
                f64::from_bits(self.max.load(Ordering::Relaxed))
            },
        }
    }
}

/// Thread-safe aggregate store for request telemetry.
///
/// One instance lives for the process lifetime and is shared by every
/// request through `AppState`.
pub struct MetricSink {
    requests: DashMap<String, AtomicU64>,
    exceptions: AtomicU64,
    processing: DashMap<String, HistogramData>,
}

impl MetricSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self {
            requests: DashMap::new(),
            exceptions: AtomicU64::new(0),
            processing: DashMap::new(),
        }
    }

    /// Increment the request counter for a route.
    pub fn increment_requests(&self, route: &str) {
        self.requests
            .entry(route.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
        metrics::counter!("catalog_requests_total", "route" => route.to_string()).increment(1);
    }

    /// Increment the global exception counter.
    pub fn increment_exceptions(&self) {
        self.exceptions.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("catalog_exceptions_total").increment(1);
    }

    /// Record a processing-time observation for a route, in milliseconds.
    pub fn record_processing_time(&self, route: &str, millis: f64) {
        self.processing
            .entry(route.to_string())
            .or_insert_with(HistogramData::new)
            .record(millis);
        metrics::histogram!("catalog_processing_time_ms", "route" => route.to_string())
            .record(millis);
    }

    /// Request count for a single route.
    pub fn requests_for(&self, route: &str) -> u64 {
        self.requests
            .get(route)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Total handled faults.
    pub fn exceptions(&self) -> u64 {
        self.exceptions.load(Ordering::Relaxed)
    }

    /// Take a snapshot of all aggregates.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut requests: Vec<(String, u64)> = self
            .requests
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();
        requests.sort_by(|a, b| a.0.cmp(&b.0));

        let mut processing_time_ms: Vec<(String, HistogramSummary)> = self
            .processing
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().to_summary()))
            .collect();
        processing_time_ms.sort_by(|a, b| a.0.cmp(&b.0));

        MetricsSnapshot {
            requests,
            exceptions: self.exceptions.load(Ordering::Relaxed),
            processing_time_ms,
        }
    }
}

impl Default for MetricSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the Prometheus exporter on the given address.
///
/// Call once at startup; failures are fatal since they indicate a
/// misconfigured bind address.
pub fn init_prometheus(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Prometheus metrics exporter started");
    Ok(())
}

/// Spawn the periodic console exporter.
///
/// Emits a structured snapshot of all aggregates on the configured cadence,
/// the way an external reporting collaborator would scrape them.
pub fn spawn_console_exporter(sink: Arc<MetricSink>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so the first report
        // covers a full interval.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let snapshot = sink.snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    tracing::info!(target: "course_catalog::metrics", snapshot = %json, "metrics snapshot")
                }
                Err(e) => tracing::debug!(error = %e, "failed to serialize metrics snapshot"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_requests_per_route() {
        let sink = MetricSink::new();
        sink.increment_requests("catalog");
        sink.increment_requests("catalog");
        sink.increment_requests("index");

        assert_eq!(sink.requests_for("catalog"), 2);
        assert_eq!(sink.requests_for("index"), 1);
        assert_eq!(sink.requests_for("unknown"), 0);
    }

    #[test]
    fn histogram_summary_tracks_bounds() {
        let sink = MetricSink::new();
        sink.record_processing_time("catalog", 4.0);
        sink.record_processing_time("catalog", 2.0);
        sink.record_processing_time("catalog", 9.0);

        let snapshot = sink.snapshot();
        let (route, summary) = &snapshot.processing_time_ms[0];
        assert_eq!(route, "catalog");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.sum, 15.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn empty_histogram_reports_zero_bounds() {
        let sink = MetricSink::new();
        sink.processing.insert("idle".to_string(), HistogramData::new());
        let snapshot = sink.snapshot();
        assert_eq!(snapshot.processing_time_ms[0].1.min, 0.0);
        assert_eq!(snapshot.processing_time_ms[0].1.max, 0.0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let sink = Arc::new(MetricSink::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let sink = sink.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    sink.increment_requests("catalog");
                    sink.increment_exceptions();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.requests_for("catalog"), 8000);
        assert_eq!(sink.exceptions(), 8000);
    }
}
