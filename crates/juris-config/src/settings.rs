//! Gateway-wide tuning knobs.

use juris_core::Operation;
use std::collections::HashMap;
use std::time::Duration;

/// Cache TTLs per key prefix plus sweep cadence.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for `process:` keys
    pub process_ttl: Duration,
    /// TTL for `person:` keys
    pub person_ttl: Duration,
    /// TTL for `document:` keys
    pub document_ttl: Duration,
    /// TTL for `movement:` keys
    pub movement_ttl: Duration,
    /// TTL for keys with no known prefix
    pub default_ttl: Duration,
    /// How often the background sweep physically removes expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            process_ttl: Duration::from_secs(2 * 60 * 60),
            person_ttl: Duration::from_secs(24 * 60 * 60),
            document_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            movement_ttl: Duration::from_secs(30 * 60),
            default_ttl: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// TTL for a cache key, derived from its prefix
    #[must_use]
    pub fn ttl_for_key(&self, key: &str) -> Duration {
        if key.starts_with("process:") {
            self.process_ttl
        } else if key.starts_with("person:") {
            self.person_ttl
        } else if key.starts_with("document:") {
            self.document_ttl
        } else if key.starts_with("movement:") {
            self.movement_ttl
        } else {
            self.default_ttl
        }
    }
}

/// Metrics retention settings.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Maximum call records kept; oldest are dropped past this cap
    pub max_events: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { max_events: 10_000 }
    }
}

/// Health monitoring cadence and hysteresis thresholds.
#[derive(Debug, Clone)]
pub struct HealthCheckConfig {
    /// Interval between background probes
    pub interval: Duration,
    /// Consecutive probe failures before a provider flips unhealthy
    pub failure_threshold: u32,
    /// Consecutive probe successes before a provider flips healthy again
    pub success_threshold: u32,
    /// Trailing window for rolling latency/success figures
    pub rolling_window: Duration,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            failure_threshold: 3,
            success_threshold: 2,
            rolling_window: Duration::from_secs(60 * 60),
        }
    }
}

/// Cost alert thresholds. An unset cap never alerts.
#[derive(Debug, Clone, Default)]
pub struct CostAlertConfig {
    /// Maximum spend per hour before alerting
    pub hourly_cap: Option<f64>,
    /// Maximum spend per day before alerting
    pub daily_cap: Option<f64>,
    /// Per-operation spend caps over the summary period
    pub operation_caps: HashMap<Operation, f64>,
}

/// Selection scoring weights, caps, and penalties.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Weight of the price component
    pub price_weight: f64,
    /// Weight of the reliability component
    pub reliability_weight: f64,
    /// Weight of the speed component
    pub speed_weight: f64,
    /// Weight of the feature-fit component
    pub feature_weight: f64,
    /// Default cost cap per operation when the caller sets no `max_cost`
    pub operation_cost_caps: HashMap<Operation, f64>,
    /// Default latency cap when the caller sets no `max_response_time`
    pub default_max_latency: Duration,
    /// Feature-fit bonus for webhook support on movement tracking
    pub webhook_bonus: f64,
    /// Maximum bonus granted for a perfect recent success rate
    pub recent_bonus_max: f64,
    /// Trailing window for the recent-success bonus
    pub recent_window: Duration,
    /// Credit fraction below which the penalty applies
    pub low_credit_fraction: f64,
    /// Multiplier applied to the total score when credits run low
    pub low_credit_penalty: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let mut operation_cost_caps = HashMap::new();
        operation_cost_caps.insert(Operation::SearchProcess, 5.0);
        operation_cost_caps.insert(Operation::SearchPerson, 3.0);
        operation_cost_caps.insert(Operation::GetDocument, 2.5);
        operation_cost_caps.insert(Operation::TrackMovements, 1.0);

        Self {
            price_weight: 0.6,
            reliability_weight: 0.2,
            speed_weight: 0.1,
            feature_weight: 0.1,
            operation_cost_caps,
            default_max_latency: Duration::from_secs(5),
            webhook_bonus: 25.0,
            recent_bonus_max: 10.0,
            recent_window: Duration::from_secs(60 * 60),
            low_credit_fraction: 0.10,
            low_credit_penalty: 0.5,
        }
    }
}

impl SelectionConfig {
    /// Cost cap for an operation when the caller sets no `max_cost`
    #[must_use]
    pub fn cost_cap(&self, operation: Operation) -> f64 {
        self.operation_cost_caps
            .get(&operation)
            .copied()
            .unwrap_or(5.0)
    }
}
