//! # concierge-observability
//!
//! Structured tracing with per-stage spans, pipeline metrics with latency
//! percentiles, a hashed query log, and the telemetry sinks that feed them.

pub mod metrics;
pub mod query_log;
pub mod sinks;
pub mod tracing_setup;

pub use metrics::{MetricsCollector, MetricsSummary};
pub use query_log::{QueryLog, QueryLogEntry};
pub use sinks::{FanoutSink, TracingTelemetrySink};
