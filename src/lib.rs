//! # Juris Gateway
//!
//! A normalized gateway over redundant Brazilian legal-data providers.
//!
//! The gateway exposes four operations (process search, person search,
//! document retrieval, movement tracking) and hides the differences
//! between the underlying providers: wire formats are normalized into
//! one domain model, and every request runs through adaptive provider
//! selection, per-provider rate limiting, retry with exponential
//! backoff, fallback across the remaining providers, TTL caching, and
//! usage metering.
//!
//! ## Quick start
//!
//! ```no_run
//! use juris_gateway::{GatewayConfig, ProviderManager, SearchOptions};
//!
//! # async fn run() -> Result<(), juris_gateway::JurisError> {
//! let config = GatewayConfig::from_env()?;
//! let gateway = ProviderManager::new(config)?;
//!
//! let process = gateway
//!     .search_process("0001234-56.2023.8.26.0100", &SearchOptions::default())
//!     .await?;
//! println!("{} movements", process.movements.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use juris_cache::{CacheManager, CacheStats};
pub use juris_config::{
    CacheConfig, CostAlertConfig, GatewayConfig, HealthCheckConfig, MetricsConfig, ProviderConfig,
    ProviderKind, RateLimitConfig, SelectionConfig,
};
pub use juris_core::{
    validate_cnj, validate_person_document, Document, DocumentType, HealthStatus, JurisError,
    JurisResult, LegalDataProvider, Movement, Operation, PartyRole, PersonDocumentType,
    PersonResult, ProcessResult, ProcessStatus, ProcessSummary, ProviderFailure, ProviderFeature,
    SearchOptions,
};
pub use juris_manager::{CostAlert, CostAlertKind, CostSummary, ProviderManager};
pub use juris_providers::{build_providers, EscavadorProvider, JuditProvider};
pub use juris_resilience::{RateLimiter, RetryConfig, RetryPolicy};
pub use juris_routing::SelectionStrategy;
pub use juris_telemetry::{
    init_tracing, CostBreakdown, MetricsCollector, MetricsSummary, TracingConfig, UsageMetric,
};
