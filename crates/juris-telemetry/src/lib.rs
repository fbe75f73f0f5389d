//! # Juris Telemetry
//!
//! Usage and health telemetry for the Juris Gateway:
//! - Bounded log of provider call outcomes (latency, success, cost)
//! - Cache hit/miss counters
//! - On-demand aggregates: cost summaries, error rates, hourly patterns
//! - CSV export
//! - Tracing subscriber initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod metrics;
pub mod tracing_setup;

// Re-export main types
pub use metrics::{
    CostBreakdown, HourlyUsage, MetricsCollector, MetricsSummary, OperationStats, UsageMetric,
};
pub use tracing_setup::{init_tracing, TracingConfig};
