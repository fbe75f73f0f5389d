//! Rolling per-adapter health state with hysteresis.
//!
//! Request outcomes feed the rolling latency/success figures; only
//! background probes drive the healthy/unhealthy transitions, so a burst
//! of request failures lowers the score without flapping availability.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use juris_config::HealthCheckConfig;
use juris_core::HealthStatus;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
struct CallSample {
    at: DateTime<Utc>,
    success: bool,
    latency_ms: u64,
}

#[derive(Debug)]
struct Inner {
    healthy: bool,
    consecutive_failures: u32,
    consecutive_successes: u32,
    last_check: DateTime<Utc>,
    samples: VecDeque<CallSample>,
    remaining_credits: Option<f64>,
    credit_limit: Option<f64>,
}

/// Health state for one adapter.
///
/// A provider flips unhealthy after `failure_threshold` consecutive probe
/// failures and back healthy after `success_threshold` consecutive probe
/// successes. Providers start healthy.
#[derive(Debug)]
pub struct HealthState {
    provider_id: String,
    failure_threshold: u32,
    success_threshold: u32,
    rolling_window: ChronoDuration,
    baseline_reliability: f64,
    baseline_latency_ms: u64,
    inner: RwLock<Inner>,
}

impl HealthState {
    /// Create health state for `provider_id`, seeded with its baseline
    /// reliability and latency until rolling data exists
    #[must_use]
    pub fn new(
        provider_id: impl Into<String>,
        config: &HealthCheckConfig,
        baseline_reliability: f64,
        baseline_latency_ms: u64,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            failure_threshold: config.failure_threshold.max(1),
            success_threshold: config.success_threshold.max(1),
            rolling_window: ChronoDuration::from_std(config.rolling_window)
                .unwrap_or_else(|_| ChronoDuration::hours(1)),
            baseline_reliability,
            baseline_latency_ms,
            inner: RwLock::new(Inner {
                healthy: true,
                consecutive_failures: 0,
                consecutive_successes: 0,
                last_check: Utc::now(),
                samples: VecDeque::new(),
                remaining_credits: None,
                credit_limit: None,
            }),
        }
    }

    /// Record the outcome of one request-path call
    pub fn record_call(&self, success: bool, latency: Duration) {
        let mut inner = self.inner.write();
        inner.samples.push_back(CallSample {
            at: Utc::now(),
            success,
            latency_ms: latency.as_millis() as u64,
        });
        Self::prune(&mut inner.samples, self.rolling_window);
    }

    /// Record the outcome of one background probe, applying hysteresis
    pub fn record_probe(&self, success: bool) {
        let mut inner = self.inner.write();
        inner.last_check = Utc::now();

        if success {
            inner.consecutive_failures = 0;
            inner.consecutive_successes += 1;
            if !inner.healthy && inner.consecutive_successes >= self.success_threshold {
                inner.healthy = true;
                info!(provider = %self.provider_id, "provider recovered");
            }
        } else {
            inner.consecutive_successes = 0;
            inner.consecutive_failures += 1;
            if inner.healthy && inner.consecutive_failures >= self.failure_threshold {
                inner.healthy = false;
                warn!(
                    provider = %self.provider_id,
                    failures = inner.consecutive_failures,
                    "provider marked unhealthy"
                );
            }
        }
    }

    /// Update the last-reported credit figures
    pub fn set_credits(&self, remaining: Option<f64>, limit: Option<f64>) {
        let mut inner = self.inner.write();
        inner.remaining_credits = remaining;
        inner.credit_limit = limit;
    }

    /// Remaining credits as last reported
    #[must_use]
    pub fn remaining_credits(&self) -> Option<f64> {
        self.inner.read().remaining_credits
    }

    /// Current snapshot. Rolling figures fall back to the configured
    /// baselines while the trailing window is empty.
    #[must_use]
    pub fn snapshot(&self) -> HealthStatus {
        let mut inner = self.inner.write();
        Self::prune(&mut inner.samples, self.rolling_window);

        let (success_rate, avg_latency_ms) = if inner.samples.is_empty() {
            (self.baseline_reliability, self.baseline_latency_ms as f64)
        } else {
            let total = inner.samples.len() as f64;
            let succeeded = inner.samples.iter().filter(|s| s.success).count() as f64;
            let latency_sum: u128 = inner.samples.iter().map(|s| u128::from(s.latency_ms)).sum();
            (succeeded / total * 100.0, latency_sum as f64 / total)
        };

        HealthStatus {
            provider: self.provider_id.clone(),
            healthy: inner.healthy,
            last_check: inner.last_check,
            avg_latency_ms,
            success_rate,
            remaining_credits: inner.remaining_credits,
            credit_limit: inner.credit_limit,
        }
    }

    fn prune(samples: &mut VecDeque<CallSample>, window: ChronoDuration) {
        let cutoff = Utc::now() - window;
        while samples.front().is_some_and(|s| s.at < cutoff) {
            samples.pop_front();
        }
    }
}
