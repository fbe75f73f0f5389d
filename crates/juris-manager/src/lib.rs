//! # Juris Manager
//!
//! Orchestration layer of the Juris Gateway.
//!
//! [`ProviderManager`] owns the registered provider adapters and runs
//! each operation through the full pipeline: cache lookup, adaptive
//! provider selection, per-provider retry, fallback across the remaining
//! providers, and usage recording. It also runs the background health
//! monitor and cache sweeper for the gateway's lifetime.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cost;
pub mod manager;
pub mod monitor;

// Re-export main types
pub use cost::{CostAlert, CostAlertKind, CostSummary};
pub use manager::ProviderManager;
pub use monitor::HealthMonitor;
