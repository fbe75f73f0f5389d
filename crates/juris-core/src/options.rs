//! Per-call search options.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options applied to a single gateway call. Never mutated by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Force a specific provider when it is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_provider: Option<String>,
    /// Maximum acceptable cost for this call; penalizes (but does not
    /// exclude) more expensive providers during selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
    /// Maximum acceptable latency; penalizes slower providers during
    /// selection
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub max_response_time: Option<Duration>,
    /// Whether a hard failure may move on to the next ranked provider
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
    /// Whether the result cache is consulted and written
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    /// Override for the key-prefix-derived cache TTL
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<Duration>,
}

fn default_true() -> bool {
    true
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            preferred_provider: None,
            max_cost: None,
            max_response_time: None,
            fallback_enabled: true,
            cache_enabled: true,
            cache_ttl: None,
        }
    }
}

impl SearchOptions {
    /// Create options with defaults (fallback and caching enabled)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer a specific provider
    #[must_use]
    pub fn with_preferred_provider(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = Some(provider.into());
        self
    }

    /// Set the maximum acceptable cost
    #[must_use]
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    /// Set the maximum acceptable latency
    #[must_use]
    pub fn with_max_response_time(mut self, max: Duration) -> Self {
        self.max_response_time = Some(max);
        self
    }

    /// Enable or disable fallback
    #[must_use]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Enable or disable caching
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Override the cache TTL for this call
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}
