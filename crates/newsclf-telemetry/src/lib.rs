//! newsclf Telemetry
//!
//! Records what the service did with each request.
//!
//! Provides:
//! - An append-only, line-oriented log of every served prediction
//! - Request counters and latency totals, mirrored to the `metrics` facade

pub mod metrics;
pub mod request_log;

pub use self::metrics::{MetricsSnapshot, RequestMetrics};
pub use request_log::{LogRecord, RequestLogger};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::metrics::RequestMetrics;
    pub use crate::request_log::{LogRecord, RequestLogger};
}
