//! Per-provider configuration.

use juris_core::{Operation, ProviderFeature};
use secrecy::SecretString;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use url::Url;

/// Which adapter implementation a provider entry maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Escavador: Bearer-token REST JSON API
    Escavador,
    /// Judit: REST JSON API with HMAC-signed request headers
    Judit,
}

/// Outbound rate limit: `requests` per `period`
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub requests: u32,
    /// Window length
    pub period: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 60,
            period: Duration::from_secs(60),
        }
    }
}

/// Immutable configuration for one provider.
///
/// Created once at process start and shared by reference for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Stable provider ID (used in metrics, cache keys, and errors)
    pub id: String,
    /// Adapter implementation to instantiate
    pub kind: ProviderKind,
    /// Human-readable name
    pub display_name: String,
    /// Base API endpoint
    pub base_url: Url,
    /// API key
    pub api_key: SecretString,
    /// API secret, for providers that sign requests
    pub api_secret: Option<SecretString>,
    /// Outbound rate limit
    pub rate_limit: RateLimitConfig,
    /// Price per call, per operation, in BRL
    pub pricing: HashMap<Operation, f64>,
    /// Features this provider supports
    pub features: HashSet<ProviderFeature>,
    /// Baseline reliability score (0-100), used until rolling data exists
    pub baseline_reliability: f64,
    /// Baseline average latency in milliseconds
    pub baseline_latency_ms: u64,
    /// Per-request timeout for outbound calls
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Create a provider configuration with conservative defaults.
    ///
    /// # Errors
    /// Returns the URL parse error when `base_url` is invalid.
    pub fn new(
        id: impl Into<String>,
        kind: ProviderKind,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let id = id.into();
        Ok(Self {
            display_name: id.clone(),
            id,
            kind,
            base_url: Url::parse(base_url)?,
            api_key: SecretString::new(api_key.into()),
            api_secret: None,
            rate_limit: RateLimitConfig::default(),
            pricing: HashMap::new(),
            features: HashSet::new(),
            baseline_reliability: 90.0,
            baseline_latency_ms: 1_000,
            timeout: Duration::from_secs(30),
        })
    }

    /// Set the display name
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the API secret (for HMAC-signing providers)
    #[must_use]
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Set the rate limit
    #[must_use]
    pub fn with_rate_limit(mut self, requests: u32, period: Duration) -> Self {
        self.rate_limit = RateLimitConfig { requests, period };
        self
    }

    /// Set the price for one operation
    #[must_use]
    pub fn with_price(mut self, operation: Operation, price: f64) -> Self {
        self.pricing.insert(operation, price);
        self
    }

    /// Add a supported feature
    #[must_use]
    pub fn with_feature(mut self, feature: ProviderFeature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Set the baseline reliability score (clamped to 0-100)
    #[must_use]
    pub fn with_baseline_reliability(mut self, score: f64) -> Self {
        self.baseline_reliability = score.clamp(0.0, 100.0);
        self
    }

    /// Set the baseline average latency
    #[must_use]
    pub fn with_baseline_latency_ms(mut self, latency_ms: u64) -> Self {
        self.baseline_latency_ms = latency_ms;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Price for one call of `operation`, zero when unpriced
    #[must_use]
    pub fn price_for(&self, operation: Operation) -> f64 {
        self.pricing.get(&operation).copied().unwrap_or(0.0)
    }

    /// Escavador defaults: all read operations, cheap per-call pricing,
    /// no webhooks.
    ///
    /// # Errors
    /// Returns the URL parse error when `base_url` is invalid.
    pub fn escavador(base_url: &str, api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self::new("escavador", ProviderKind::Escavador, base_url, api_key)?
            .with_display_name("Escavador")
            .with_rate_limit(500, Duration::from_secs(60))
            .with_price(Operation::SearchProcess, 0.30)
            .with_price(Operation::SearchPerson, 0.50)
            .with_price(Operation::GetDocument, 1.20)
            .with_price(Operation::TrackMovements, 0.10)
            .with_feature(ProviderFeature::ProcessSearch)
            .with_feature(ProviderFeature::PersonSearch)
            .with_feature(ProviderFeature::DocumentRetrieval)
            .with_feature(ProviderFeature::MovementTracking)
            .with_feature(ProviderFeature::BulkExport)
            .with_baseline_reliability(95.0)
            .with_baseline_latency_ms(800))
    }

    /// Judit defaults: all read operations plus webhook notifications,
    /// higher per-call pricing.
    ///
    /// # Errors
    /// Returns the URL parse error when `base_url` is invalid.
    pub fn judit(
        base_url: &str,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self::new("judit", ProviderKind::Judit, base_url, api_key)?
            .with_display_name("Judit")
            .with_api_secret(api_secret)
            .with_rate_limit(120, Duration::from_secs(60))
            .with_price(Operation::SearchProcess, 0.90)
            .with_price(Operation::SearchPerson, 1.50)
            .with_price(Operation::GetDocument, 2.00)
            .with_price(Operation::TrackMovements, 0.25)
            .with_feature(ProviderFeature::ProcessSearch)
            .with_feature(ProviderFeature::PersonSearch)
            .with_feature(ProviderFeature::DocumentRetrieval)
            .with_feature(ProviderFeature::MovementTracking)
            .with_feature(ProviderFeature::WebhookNotifications)
            .with_baseline_reliability(98.0)
            .with_baseline_latency_ms(600))
    }
}
