//! The provider orchestration pipeline.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::future::BoxFuture;
use juris_cache::CacheManager;
use juris_config::GatewayConfig;
use juris_core::{
    validate_cnj, validate_person_document, Document, HealthStatus, JurisError, JurisResult,
    LegalDataProvider, Movement, Operation, PersonResult, ProcessResult, ProviderFailure,
    SearchOptions,
};
use juris_providers::build_providers;
use juris_resilience::RetryPolicy;
use juris_routing::SelectionStrategy;
use juris_telemetry::{MetricsCollector, MetricsSummary};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::cost::{self, CostSummary};
use crate::monitor::HealthMonitor;

/// Entry point for all gateway operations.
///
/// Owns the provider adapters and runs every request through cache
/// lookup, provider selection, retry, and fallback. Constructing a
/// manager spawns the cache sweeper and the health monitor; both run
/// until [`ProviderManager::shutdown`] or drop.
///
/// Must be constructed inside a Tokio runtime.
pub struct ProviderManager {
    providers: Vec<Arc<dyn LegalDataProvider>>,
    strategy: SelectionStrategy,
    retry: RetryPolicy,
    cache: Arc<CacheManager>,
    metrics: Arc<MetricsCollector>,
    config: GatewayConfig,
    sweeper: JoinHandle<()>,
    monitor: JoinHandle<()>,
}

impl ProviderManager {
    /// Build the adapters from configuration and start the gateway.
    ///
    /// # Errors
    /// Returns [`JurisError::Configuration`] when the provider list is
    /// empty or an adapter rejects its configuration.
    pub fn new(config: GatewayConfig) -> JurisResult<Self> {
        let providers = build_providers(&config.providers, &config.health)?;
        Ok(Self::from_parts(providers, config))
    }

    /// Start the gateway over pre-built adapters.
    ///
    /// Useful for registering custom [`LegalDataProvider`]
    /// implementations alongside or instead of the built-in ones.
    #[must_use]
    pub fn from_parts(
        providers: Vec<Arc<dyn LegalDataProvider>>,
        config: GatewayConfig,
    ) -> Self {
        let cache = Arc::new(CacheManager::new(config.cache.clone()));
        let metrics = Arc::new(MetricsCollector::new(config.metrics.max_events));
        let strategy = SelectionStrategy::new(config.selection.clone(), Arc::clone(&metrics));
        let retry = RetryPolicy::new(config.retry.clone());

        let sweeper = cache.spawn_sweeper();
        let monitor = HealthMonitor::spawn(providers.clone(), config.health.interval);

        info!(providers = providers.len(), "provider manager started");
        Self {
            providers,
            strategy,
            retry,
            cache,
            metrics,
            config,
            sweeper,
            monitor,
        }
    }

    /// Look up a legal process by its CNJ number.
    ///
    /// The number may be formatted (`NNNNNNN-DD.AAAA.J.TR.OOOO`) or bare
    /// digits; results are cached under the digits-only form.
    #[instrument(skip(self, options))]
    pub async fn search_process(
        &self,
        number: &str,
        options: &SearchOptions,
    ) -> JurisResult<ProcessResult> {
        let digits = validate_cnj(number)?;
        let cache_key = format!("process:{digits}");
        let call_options = options.clone();
        self.execute(Operation::SearchProcess, &cache_key, options, move |p| {
            let digits = digits.clone();
            let options = call_options.clone();
            Box::pin(async move { p.search_process(&digits, &options).await })
        })
        .await
    }

    /// Look up a person by CPF or CNPJ.
    #[instrument(skip(self, options))]
    pub async fn search_person(
        &self,
        document: &str,
        options: &SearchOptions,
    ) -> JurisResult<PersonResult> {
        let (digits, _) = validate_person_document(document)?;
        let cache_key = format!("person:{digits}");
        let call_options = options.clone();
        self.execute(Operation::SearchPerson, &cache_key, options, move |p| {
            let digits = digits.clone();
            let options = call_options.clone();
            Box::pin(async move { p.search_person(&digits, &options).await })
        })
        .await
    }

    /// Fetch one document by its provider-side ID.
    #[instrument(skip(self, options))]
    pub async fn get_document(
        &self,
        id: &str,
        options: &SearchOptions,
    ) -> JurisResult<Document> {
        if id.trim().is_empty() {
            return Err(JurisError::validation("id", "document id must not be empty"));
        }
        let id = id.trim().to_string();
        let cache_key = format!("document:{id}");
        let call_options = options.clone();
        self.execute(Operation::GetDocument, &cache_key, options, move |p| {
            let id = id.clone();
            let options = call_options.clone();
            Box::pin(async move { p.get_document(&id, &options).await })
        })
        .await
    }

    /// List movements for a process, optionally only those at or after
    /// `since`.
    ///
    /// Results for different `since` values are cached independently.
    #[instrument(skip(self, options))]
    pub async fn track_movements(
        &self,
        process_id: &str,
        since: Option<DateTime<Utc>>,
        options: &SearchOptions,
    ) -> JurisResult<Vec<Movement>> {
        if process_id.trim().is_empty() {
            return Err(JurisError::validation(
                "process_id",
                "process id must not be empty",
            ));
        }
        let process_id = process_id.trim().to_string();
        let cache_key = match since {
            Some(s) => format!("movement:{process_id}:{}", s.timestamp()),
            None => format!("movement:{process_id}"),
        };
        self.execute(Operation::TrackMovements, &cache_key, options, move |p| {
            let process_id = process_id.clone();
            Box::pin(async move { p.track_movements(&process_id, since).await })
        })
        .await
    }

    /// Cache lookup, candidate chain, retry, fallback, and recording for
    /// one operation.
    async fn execute<T, F>(
        &self,
        operation: Operation,
        cache_key: &str,
        options: &SearchOptions,
        call: F,
    ) -> JurisResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: for<'a> Fn(&'a dyn LegalDataProvider) -> BoxFuture<'a, JurisResult<T>>,
    {
        if options.cache_enabled {
            if let Some(value) = self.cache.get(cache_key) {
                if let Ok(cached) = serde_json::from_value::<T>(value) {
                    self.metrics.record_cache_hit(operation);
                    debug!(key = cache_key, "served from cache");
                    return Ok(cached);
                }
                // Stored under an older shape; treat as a miss.
                self.cache.delete(cache_key);
            }
            self.metrics.record_cache_miss(operation);
        }

        let chain = self.candidates(operation, options);
        if chain.is_empty() {
            return Err(self.none_available(operation));
        }

        let mut failures = Vec::new();
        for provider in chain {
            let outcome = self
                .retry
                .execute(|| async {
                    let started = Instant::now();
                    let result = call(provider.as_ref()).await;
                    let latency = started.elapsed();
                    match &result {
                        Ok(_) => self.metrics.record_api_call(
                            provider.id(),
                            operation,
                            true,
                            latency,
                            provider.estimate_cost(operation, 1),
                            None,
                        ),
                        Err(error) => self.metrics.record_api_call(
                            provider.id(),
                            operation,
                            false,
                            latency,
                            0.0,
                            Some(error.to_string()),
                        ),
                    }
                    result
                })
                .await;

            match outcome {
                Ok(value) => {
                    if options.cache_enabled {
                        match serde_json::to_value(&value) {
                            Ok(json) => self.cache.set(cache_key, json, options.cache_ttl),
                            Err(error) => {
                                debug!(key = cache_key, error = %error, "result not cacheable");
                            }
                        }
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !error.is_fallback_eligible() {
                        return Err(error);
                    }
                    warn!(
                        provider = %provider.id(),
                        operation = %operation,
                        error = %error,
                        "provider failed, moving to next candidate"
                    );
                    failures.push(ProviderFailure {
                        provider: provider.id().to_string(),
                        error: error.to_string(),
                    });
                }
            }
        }

        Err(JurisError::AllProvidersFailed {
            operation: operation.as_str().to_string(),
            failures,
        })
    }

    /// Candidate chain: the preferred provider first when usable, then
    /// the remaining providers by rank. With fallback disabled only the
    /// first candidate is tried. A provider appears at most once.
    fn candidates(
        &self,
        operation: Operation,
        options: &SearchOptions,
    ) -> Vec<Arc<dyn LegalDataProvider>> {
        let mut chain: Vec<Arc<dyn LegalDataProvider>> = Vec::new();

        if let Some(preferred) = &options.preferred_provider {
            if let Some(provider) = self.providers.iter().find(|p| p.id() == preferred.as_str()) {
                if provider.is_available() && provider.supports(operation.required_feature()) {
                    chain.push(Arc::clone(provider));
                } else {
                    debug!(
                        provider = %preferred,
                        "preferred provider not usable, using ranking only"
                    );
                }
            }
        }

        for scored in self.strategy.rank(operation, &self.providers, options) {
            if !chain.iter().any(|c| c.id() == scored.provider.id()) {
                chain.push(scored.provider);
            }
        }

        if !options.fallback_enabled {
            chain.truncate(1);
        }
        chain
    }

    fn none_available(&self, operation: Operation) -> JurisError {
        let failures = self
            .providers
            .iter()
            .map(|p| {
                let reason = if !p.is_available() {
                    "unavailable"
                } else {
                    "operation not supported"
                };
                ProviderFailure {
                    provider: p.id().to_string(),
                    error: reason.to_string(),
                }
            })
            .collect();
        JurisError::AllProvidersFailed {
            operation: operation.as_str().to_string(),
            failures,
        }
    }

    /// Current health snapshot of every registered provider
    #[must_use]
    pub fn health_status(&self) -> Vec<HealthStatus> {
        self.providers.iter().map(|p| p.health_snapshot()).collect()
    }

    /// Probe every provider now, outside the monitor cadence
    pub async fn refresh_health(&self) -> Vec<HealthStatus> {
        let mut statuses = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            statuses.push(provider.check_health().await);
        }
        statuses
    }

    /// Usage aggregate, optionally filtered by provider and start time
    #[must_use]
    pub fn usage_summary(
        &self,
        provider: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> MetricsSummary {
        self.metrics.summary(provider, since)
    }

    /// Cost totals over the trailing `period` plus any breached caps.
    ///
    /// Alerts always compare against the configured hourly/daily windows
    /// regardless of the requested period.
    #[must_use]
    pub fn cost_summary(&self, period: Duration) -> CostSummary {
        let since = Utc::now()
            - ChronoDuration::from_std(period).unwrap_or_else(|_| ChronoDuration::days(1));
        let breakdown = self.metrics.cost_breakdown(Some(since));
        let alerts = cost::evaluate(&self.metrics, &self.config.cost_alerts);
        CostSummary { breakdown, alerts }
    }

    /// The registered providers, in configuration order
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn LegalDataProvider>] {
        &self.providers
    }

    /// The shared metrics collector
    #[must_use]
    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// The shared response cache
    #[must_use]
    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// Stop the background tasks and drop cached state.
    ///
    /// In-flight operations complete normally; the cache and metrics are
    /// cleared.
    pub fn shutdown(&self) {
        self.sweeper.abort();
        self.monitor.abort();
        self.cache.clear();
        self.metrics.clear();
        info!("provider manager stopped");
    }
}

impl Drop for ProviderManager {
    fn drop(&mut self) {
        self.sweeper.abort();
        self.monitor.abort();
    }
}
