//! Request metrics

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters for `/predict` outcomes.
///
/// Every update is also forwarded to the `metrics` facade so an installed
/// exporter (Prometheus in the server binary) sees the same numbers.
#[derive(Clone)]
pub struct RequestMetrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    served: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    total_latency_us: AtomicU64,
}

impl RequestMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                served: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                total_latency_us: AtomicU64::new(0),
            }),
        }
    }

    /// Record a successful prediction
    pub fn record_served(&self, latency: Duration) {
        self.inner.served.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);

        metrics::counter!("newsclf_requests_total", "outcome" => "served").increment(1);
        metrics::histogram!("newsclf_predict_latency_ms").record(latency.as_secs_f64() * 1000.0);
    }

    /// Record a request rejected by validation
    pub fn record_rejected(&self) {
        self.inner.rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("newsclf_requests_total", "outcome" => "rejected").increment(1);
    }

    /// Record a request that failed inside the service
    pub fn record_failed(&self, kind: &'static str) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("newsclf_requests_total", "outcome" => "failed").increment(1);
        metrics::counter!("newsclf_errors_total", "kind" => kind).increment(1);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            served: self.inner.served.load(Ordering::Relaxed),
            rejected: self.inner.rejected.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub served: u64,
    pub rejected: u64,
    pub failed: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    /// Average latency of served requests
    pub fn avg_latency_us(&self) -> u64 {
        if self.served == 0 {
            0
        } else {
            self.total_latency_us / self.served
        }
    }

    /// Render in Prometheus text exposition format
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("# HELP newsclf_requests_total Prediction requests by outcome\n");
        out.push_str("# TYPE newsclf_requests_total counter\n");
        for (outcome, value) in [
            ("served", self.served),
            ("rejected", self.rejected),
            ("failed", self.failed),
        ] {
            let _ = writeln!(out, "newsclf_requests_total{{outcome=\"{outcome}\"}} {value}");
        }
        out.push_str("# HELP newsclf_predict_latency_avg_us Average latency of served predictions\n");
        out.push_str("# TYPE newsclf_predict_latency_avg_us gauge\n");
        let _ = writeln!(out, "newsclf_predict_latency_avg_us {}", self.avg_latency_us());
        out
    }
}
