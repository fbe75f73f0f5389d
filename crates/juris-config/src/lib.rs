//! # Juris Config
//!
//! Configuration model for the Juris Gateway:
//! - Per-provider identity, credentials, rate limits, pricing, and features
//! - Cache TTLs per key prefix
//! - Health-check cadence and hysteresis thresholds
//! - Cost alert thresholds
//! - Selection scoring weights and caps
//!
//! Everything is constructed once at process start (from code or from
//! `JURIS_*` environment variables) and is immutable afterwards.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod gateway;
pub mod provider;
pub mod settings;

// Re-export main types
pub use gateway::GatewayConfig;
pub use provider::{ProviderConfig, ProviderKind, RateLimitConfig};
pub use settings::{
    CacheConfig, CostAlertConfig, HealthCheckConfig, MetricsConfig, SelectionConfig,
};
