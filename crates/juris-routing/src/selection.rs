//! Weighted provider scoring and ranking.
//!
//! Score components are each normalized to a 0-100 scale:
//! - price: how far the estimated cost sits below the operation's cap
//! - reliability: the provider's rolling success rate
//! - speed: how far the rolling latency sits below the latency cap
//! - feature fit: base 100, plus a bonus for webhook support on
//!   movement tracking
//!
//! The weighted sum is then adjusted by a recent-performance bonus from
//! observed call outcomes and halved when the provider is nearly out of
//! credits. An estimated cost over the cap zeroes the price component
//! but never disqualifies the provider.

use juris_config::SelectionConfig;
use juris_core::{JurisError, JurisResult, LegalDataProvider, Operation, ProviderFeature, SearchOptions};
use juris_telemetry::MetricsCollector;
use std::sync::Arc;
use tracing::debug;

/// Per-component score detail for one ranked provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Price component, 0-100
    pub price: f64,
    /// Reliability component, 0-100
    pub reliability: f64,
    /// Speed component, 0-100
    pub speed: f64,
    /// Feature-fit component, 100 or 100 plus the webhook bonus
    pub feature: f64,
    /// Bonus from the recent observed success rate
    pub recent_bonus: f64,
    /// Whether the low-credit penalty was applied
    pub credit_penalized: bool,
}

/// One provider with its computed score
pub struct ScoredProvider {
    /// The scored provider
    pub provider: Arc<dyn LegalDataProvider>,
    /// Weighted total
    pub score: f64,
    /// Per-component detail
    pub breakdown: ScoreBreakdown,
}

/// Ranks providers for an operation by weighted score.
///
/// Stateless apart from its configuration and a handle to the metrics
/// collector; safe to share across tasks.
pub struct SelectionStrategy {
    config: SelectionConfig,
    metrics: Arc<MetricsCollector>,
}

impl SelectionStrategy {
    /// Create a strategy with the given weights and metrics source
    #[must_use]
    pub fn new(config: SelectionConfig, metrics: Arc<MetricsCollector>) -> Self {
        Self { config, metrics }
    }

    /// Rank the providers able to serve `operation`, best first.
    ///
    /// Providers that are unavailable or lack the operation's required
    /// feature are excluded. Ties keep the input order.
    #[must_use]
    pub fn rank(
        &self,
        operation: Operation,
        providers: &[Arc<dyn LegalDataProvider>],
        options: &SearchOptions,
    ) -> Vec<ScoredProvider> {
        let mut scored: Vec<ScoredProvider> = providers
            .iter()
            .filter(|p| p.is_available() && p.supports(operation.required_feature()))
            .map(|p| self.score(operation, Arc::clone(p), options))
            .collect();

        // Stable sort: equal scores keep configuration order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for entry in &scored {
            debug!(
                provider = %entry.provider.id(),
                operation = %operation,
                score = entry.score,
                price = entry.breakdown.price,
                reliability = entry.breakdown.reliability,
                speed = entry.breakdown.speed,
                "ranked provider"
            );
        }
        scored
    }

    /// Pick the provider for `operation`.
    ///
    /// An available preferred provider that supports the operation wins
    /// outright; otherwise the top-ranked provider is chosen.
    ///
    /// # Errors
    /// Returns [`JurisError::AllProvidersFailed`] when no provider is
    /// available for the operation, naming each excluded provider.
    pub fn select(
        &self,
        operation: Operation,
        providers: &[Arc<dyn LegalDataProvider>],
        options: &SearchOptions,
    ) -> JurisResult<Arc<dyn LegalDataProvider>> {
        if let Some(preferred) = &options.preferred_provider {
            if let Some(provider) = providers.iter().find(|p| p.id() == preferred.as_str()) {
                if provider.is_available() && provider.supports(operation.required_feature()) {
                    return Ok(Arc::clone(provider));
                }
                debug!(
                    provider = %preferred,
                    operation = %operation,
                    "preferred provider unavailable, falling back to ranking"
                );
            }
        }

        self.rank(operation, providers, options)
            .into_iter()
            .next()
            .map(|s| s.provider)
            .ok_or_else(|| Self::none_available(operation, providers))
    }

    fn none_available(
        operation: Operation,
        providers: &[Arc<dyn LegalDataProvider>],
    ) -> JurisError {
        let failures = providers
            .iter()
            .map(|p| {
                let reason = if !p.is_available() {
                    "unavailable"
                } else {
                    "operation not supported"
                };
                juris_core::ProviderFailure {
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

    fn score(
        &self,
        operation: Operation,
        provider: Arc<dyn LegalDataProvider>,
        options: &SearchOptions,
    ) -> ScoredProvider {
        let snapshot = provider.health_snapshot();

        let cost = provider.estimate_cost(operation, 1);
        let cap = options
            .max_cost
            .unwrap_or_else(|| self.config.cost_cap(operation))
            .max(f64::EPSILON);
        let price = (100.0 * (1.0 - cost / cap)).clamp(0.0, 100.0);

        let reliability = snapshot.success_rate.clamp(0.0, 100.0);

        let max_latency_ms = options
            .max_response_time
            .unwrap_or(self.config.default_max_latency)
            .as_millis()
            .max(1) as f64;
        let speed = (100.0 * (1.0 - snapshot.avg_latency_ms / max_latency_ms)).clamp(0.0, 100.0);

        let mut feature = 100.0;
        if operation == Operation::TrackMovements
            && provider.supports(ProviderFeature::WebhookNotifications)
        {
            feature += self.config.webhook_bonus;
        }

        let recent_bonus = self
            .metrics
            .recent_success_rate(provider.id(), self.config.recent_window)
            .map_or(0.0, |rate| rate / 100.0 * self.config.recent_bonus_max);

        let mut total = self.config.price_weight * price
            + self.config.reliability_weight * reliability
            + self.config.speed_weight * speed
            + self.config.feature_weight * feature
            + recent_bonus;

        let credit_penalized = snapshot
            .credit_fraction()
            .map_or(false, |f| f < self.config.low_credit_fraction);
        if credit_penalized {
            total *= self.config.low_credit_penalty;
        }

        ScoredProvider {
            provider,
            score: total,
            breakdown: ScoreBreakdown {
                price,
                reliability,
                speed,
                feature,
                recent_bonus,
                credit_penalized,
            },
        }
    }
}
