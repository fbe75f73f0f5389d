//! Integration tests for the Juris Gateway
//!
//! Exercises the full pipeline against wiremock provider backends:
//! - provider selection and fallback chains
//! - caching behavior and TTL overrides
//! - outbound rate limiting
//! - usage metrics and cost tracking

pub mod helpers;
pub mod mock_providers;

// Re-export commonly used items
pub use helpers::*;
pub use mock_providers::*;

#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod manager_tests;
#[cfg(test)]
mod metrics_tests;
#[cfg(test)]
mod rate_limit_tests;
#[cfg(test)]
mod selection_tests;
