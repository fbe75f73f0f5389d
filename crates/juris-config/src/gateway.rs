//! Top-level gateway configuration and environment loading.

use juris_core::{JurisError, JurisResult};
use juris_resilience::RetryConfig;
use std::time::Duration;
use tracing::info;

use crate::provider::ProviderConfig;
use crate::settings::{
    CacheConfig, CostAlertConfig, HealthCheckConfig, MetricsConfig, SelectionConfig,
};

/// Complete gateway configuration, constructed once at process start.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Providers to register, in configuration order
    pub providers: Vec<ProviderConfig>,
    /// Cache TTLs and sweep cadence
    pub cache: CacheConfig,
    /// Metrics retention
    pub metrics: MetricsConfig,
    /// Retry policy for retryable provider failures
    pub retry: RetryConfig,
    /// Health monitoring cadence and hysteresis
    pub health: HealthCheckConfig,
    /// Cost alert thresholds
    pub cost_alerts: CostAlertConfig,
    /// Selection scoring knobs
    pub selection: SelectionConfig,
}

impl GatewayConfig {
    /// Create a configuration with the given providers and default knobs
    #[must_use]
    pub fn new(providers: Vec<ProviderConfig>) -> Self {
        Self {
            providers,
            cache: CacheConfig::default(),
            metrics: MetricsConfig::default(),
            retry: RetryConfig::default(),
            health: HealthCheckConfig::default(),
            cost_alerts: CostAlertConfig::default(),
            selection: SelectionConfig::default(),
        }
    }

    /// Replace the cache settings
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the metrics settings
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the retry settings
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the health-check settings
    #[must_use]
    pub fn with_health(mut self, health: HealthCheckConfig) -> Self {
        self.health = health;
        self
    }

    /// Replace the cost alert thresholds
    #[must_use]
    pub fn with_cost_alerts(mut self, cost_alerts: CostAlertConfig) -> Self {
        self.cost_alerts = cost_alerts;
        self
    }

    /// Replace the selection settings
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    /// Load configuration from `JURIS_*` environment variables.
    ///
    /// A provider is registered when its API key variable is present:
    /// - `JURIS_ESCAVADOR_API_KEY` (+ optional `JURIS_ESCAVADOR_BASE_URL`)
    /// - `JURIS_JUDIT_API_KEY` + `JURIS_JUDIT_API_SECRET`
    ///   (+ optional `JURIS_JUDIT_BASE_URL`)
    ///
    /// Optional knobs: `JURIS_CACHE_SWEEP_SECS`, `JURIS_CACHE_DEFAULT_TTL_SECS`,
    /// `JURIS_HEALTH_INTERVAL_SECS`, `JURIS_HEALTH_FAILURE_THRESHOLD`,
    /// `JURIS_HEALTH_SUCCESS_THRESHOLD`, `JURIS_METRICS_MAX_EVENTS`,
    /// `JURIS_RETRY_MAX_ATTEMPTS`, `JURIS_COST_HOURLY_CAP`,
    /// `JURIS_COST_DAILY_CAP`.
    ///
    /// # Errors
    /// Returns [`JurisError::Configuration`] when no provider is
    /// configured, a base URL is malformed, or a numeric knob fails to
    /// parse.
    pub fn from_env() -> JurisResult<Self> {
        let mut providers = Vec::new();

        if let Ok(api_key) = std::env::var("JURIS_ESCAVADOR_API_KEY") {
            let base_url = std::env::var("JURIS_ESCAVADOR_BASE_URL")
                .unwrap_or_else(|_| "https://api.escavador.com".to_string());
            providers.push(
                ProviderConfig::escavador(&base_url, api_key).map_err(|e| {
                    JurisError::configuration(format!("invalid Escavador base URL: {e}"))
                })?,
            );
        }

        if let Ok(api_key) = std::env::var("JURIS_JUDIT_API_KEY") {
            let api_secret = std::env::var("JURIS_JUDIT_API_SECRET").map_err(|_| {
                JurisError::configuration("JURIS_JUDIT_API_SECRET is required with JURIS_JUDIT_API_KEY")
            })?;
            let base_url = std::env::var("JURIS_JUDIT_BASE_URL")
                .unwrap_or_else(|_| "https://requests.prod.judit.io".to_string());
            providers.push(
                ProviderConfig::judit(&base_url, api_key, api_secret).map_err(|e| {
                    JurisError::configuration(format!("invalid Judit base URL: {e}"))
                })?,
            );
        }

        if providers.is_empty() {
            return Err(JurisError::configuration(
                "no providers configured; set JURIS_ESCAVADOR_API_KEY and/or JURIS_JUDIT_API_KEY",
            ));
        }

        let mut config = Self::new(providers);

        if let Some(secs) = env_u64("JURIS_CACHE_SWEEP_SECS")? {
            config.cache.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("JURIS_CACHE_DEFAULT_TTL_SECS")? {
            config.cache.default_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("JURIS_HEALTH_INTERVAL_SECS")? {
            config.health.interval = Duration::from_secs(secs);
        }
        if let Some(n) = env_u64("JURIS_HEALTH_FAILURE_THRESHOLD")? {
            config.health.failure_threshold = n as u32;
        }
        if let Some(n) = env_u64("JURIS_HEALTH_SUCCESS_THRESHOLD")? {
            config.health.success_threshold = n as u32;
        }
        if let Some(n) = env_u64("JURIS_METRICS_MAX_EVENTS")? {
            config.metrics.max_events = n as usize;
        }
        if let Some(n) = env_u64("JURIS_RETRY_MAX_ATTEMPTS")? {
            config.retry.max_retries = n as u32;
        }
        if let Some(cap) = env_f64("JURIS_COST_HOURLY_CAP")? {
            config.cost_alerts.hourly_cap = Some(cap);
        }
        if let Some(cap) = env_f64("JURIS_COST_DAILY_CAP")? {
            config.cost_alerts.daily_cap = Some(cap);
        }

        info!(
            providers = config.providers.len(),
            "gateway configuration loaded from environment"
        );
        Ok(config)
    }
}

fn env_u64(name: &str) -> JurisResult<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| JurisError::configuration(format!("{name} must be an integer, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

fn env_f64(name: &str) -> JurisResult<Option<f64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| JurisError::configuration(format!("{name} must be a number, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}
