//! Bounded usage metrics with on-demand aggregation.
//!
//! Call records live in a capacity-bounded ring (oldest dropped first);
//! every aggregate is computed on demand over the stored window, so
//! correctness only requires the ring to be a faithful, time-ordered,
//! bounded record of calls.

use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use juris_core::Operation;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tracing::debug;

/// One recorded provider call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetric {
    /// Provider ID
    pub provider: String,
    /// Operation performed
    pub operation: Operation,
    /// When the call completed
    pub timestamp: DateTime<Utc>,
    /// Observed latency in milliseconds
    pub latency_ms: u64,
    /// Whether the call succeeded
    pub success: bool,
    /// Cost charged for the call, in BRL
    pub cost: f64,
    /// Rendered error, for failed calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate over a set of stored calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Calls in the window
    pub total_calls: u64,
    /// Successful calls
    pub successful_calls: u64,
    /// Failed calls
    pub failed_calls: u64,
    /// Total cost in BRL
    pub total_cost: f64,
    /// Mean latency in milliseconds
    pub average_latency_ms: f64,
    /// Overall cache hit rate (0.0 - 1.0) across all operations
    pub cache_hit_rate: f64,
}

/// Cost totals split by provider and by operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Total cost in the window
    pub total: f64,
    /// Cost per provider
    pub by_provider: HashMap<String, f64>,
    /// Cost per operation
    pub by_operation: HashMap<Operation, f64>,
}

/// Per-operation call statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationStats {
    /// Calls in the window
    pub calls: u64,
    /// Successful calls
    pub successful: u64,
    /// Failed calls
    pub failed: u64,
    /// Mean latency in milliseconds
    pub average_latency_ms: f64,
    /// Total cost in BRL
    pub total_cost: f64,
}

/// Calls and cost for one hour of the day (0-23)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyUsage {
    /// Hour of day, 0-23
    pub hour: u32,
    /// Calls observed in that hour
    pub calls: u64,
    /// Cost accrued in that hour
    pub cost: f64,
}

/// Bounded collector of call outcomes and cache counters.
pub struct MetricsCollector {
    capacity: usize,
    calls: RwLock<VecDeque<UsageMetric>>,
    cache_hits: RwLock<HashMap<Operation, u64>>,
    cache_misses: RwLock<HashMap<Operation, u64>>,
}

impl MetricsCollector {
    /// Create a collector keeping at most `capacity` call records
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            calls: RwLock::new(VecDeque::new()),
            cache_hits: RwLock::new(HashMap::new()),
            cache_misses: RwLock::new(HashMap::new()),
        }
    }

    /// Create a collector with the default capacity (10 000 records)
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(10_000)
    }

    /// Append a fully-formed record, evicting the oldest past capacity
    pub fn record(&self, metric: UsageMetric) {
        let mut calls = self.calls.write();
        if calls.len() >= self.capacity {
            calls.pop_front();
        }
        calls.push_back(metric);
    }

    /// Record one provider call outcome, stamped now
    pub fn record_api_call(
        &self,
        provider: impl Into<String>,
        operation: Operation,
        success: bool,
        latency: Duration,
        cost: f64,
        error: Option<String>,
    ) {
        let provider = provider.into();
        debug!(
            provider = %provider,
            operation = %operation,
            success,
            latency_ms = latency.as_millis() as u64,
            cost,
            "recording api call"
        );
        self.record(UsageMetric {
            provider,
            operation,
            timestamp: Utc::now(),
            latency_ms: latency.as_millis() as u64,
            success,
            cost,
            error,
        });
    }

    /// Count a cache hit for an operation
    pub fn record_cache_hit(&self, operation: Operation) {
        *self.cache_hits.write().entry(operation).or_insert(0) += 1;
    }

    /// Count a cache miss for an operation
    pub fn record_cache_miss(&self, operation: Operation) {
        *self.cache_misses.write().entry(operation).or_insert(0) += 1;
    }

    /// Overall cache hit rate across all operations (0.0 - 1.0)
    #[must_use]
    pub fn cache_hit_rate(&self) -> f64 {
        let hits: u64 = self.cache_hits.read().values().sum();
        let misses: u64 = self.cache_misses.read().values().sum();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Stored calls for one provider, optionally only those after `since`
    #[must_use]
    pub fn provider_metrics(
        &self,
        provider: &str,
        since: Option<DateTime<Utc>>,
    ) -> Vec<UsageMetric> {
        self.calls
            .read()
            .iter()
            .filter(|m| m.provider == provider && since.map_or(true, |s| m.timestamp >= s))
            .cloned()
            .collect()
    }

    /// Aggregate over the stored window, optionally filtered by provider
    /// and/or start time
    #[must_use]
    pub fn summary(&self, provider: Option<&str>, since: Option<DateTime<Utc>>) -> MetricsSummary {
        let calls = self.calls.read();
        let mut summary = MetricsSummary {
            cache_hit_rate: self.cache_hit_rate(),
            ..MetricsSummary::default()
        };
        let mut latency_total: u128 = 0;

        for metric in calls.iter().filter(|m| {
            provider.map_or(true, |p| m.provider == p)
                && since.map_or(true, |s| m.timestamp >= s)
        }) {
            summary.total_calls += 1;
            if metric.success {
                summary.successful_calls += 1;
            } else {
                summary.failed_calls += 1;
            }
            summary.total_cost += metric.cost;
            latency_total += u128::from(metric.latency_ms);
        }

        if summary.total_calls > 0 {
            summary.average_latency_ms = latency_total as f64 / summary.total_calls as f64;
        }
        summary
    }

    /// Cost totals by provider and operation
    #[must_use]
    pub fn cost_breakdown(&self, since: Option<DateTime<Utc>>) -> CostBreakdown {
        let calls = self.calls.read();
        let mut breakdown = CostBreakdown::default();

        for metric in calls
            .iter()
            .filter(|m| since.map_or(true, |s| m.timestamp >= s))
        {
            breakdown.total += metric.cost;
            *breakdown
                .by_provider
                .entry(metric.provider.clone())
                .or_insert(0.0) += metric.cost;
            *breakdown.by_operation.entry(metric.operation).or_insert(0.0) += metric.cost;
        }
        breakdown
    }

    /// Per-operation call statistics
    #[must_use]
    pub fn operation_stats(&self, since: Option<DateTime<Utc>>) -> HashMap<Operation, OperationStats> {
        let calls = self.calls.read();
        let mut stats: HashMap<Operation, OperationStats> = HashMap::new();
        let mut latency_totals: HashMap<Operation, u128> = HashMap::new();

        for metric in calls
            .iter()
            .filter(|m| since.map_or(true, |s| m.timestamp >= s))
        {
            let entry = stats.entry(metric.operation).or_default();
            entry.calls += 1;
            if metric.success {
                entry.successful += 1;
            } else {
                entry.failed += 1;
            }
            entry.total_cost += metric.cost;
            *latency_totals.entry(metric.operation).or_insert(0) += u128::from(metric.latency_ms);
        }

        for (operation, entry) in &mut stats {
            if entry.calls > 0 {
                entry.average_latency_ms =
                    latency_totals[operation] as f64 / entry.calls as f64;
            }
        }
        stats
    }

    /// Failure rate (0.0 - 1.0) per provider
    #[must_use]
    pub fn error_rates(&self, since: Option<DateTime<Utc>>) -> HashMap<String, f64> {
        let calls = self.calls.read();
        let mut totals: HashMap<String, (u64, u64)> = HashMap::new();

        for metric in calls
            .iter()
            .filter(|m| since.map_or(true, |s| m.timestamp >= s))
        {
            let entry = totals.entry(metric.provider.clone()).or_insert((0, 0));
            entry.0 += 1;
            if !metric.success {
                entry.1 += 1;
            }
        }

        totals
            .into_iter()
            .map(|(provider, (total, failed))| (provider, failed as f64 / total as f64))
            .collect()
    }

    /// Calls and cost per hour of day over the last `days` days.
    ///
    /// Always returns 24 buckets, hour 0 through 23.
    #[must_use]
    pub fn hourly_usage_pattern(&self, days: u32) -> Vec<HourlyUsage> {
        let cutoff = Utc::now() - ChronoDuration::days(i64::from(days));
        let calls = self.calls.read();

        let mut buckets: Vec<HourlyUsage> = (0..24)
            .map(|hour| HourlyUsage {
                hour,
                ..HourlyUsage::default()
            })
            .collect();

        for metric in calls.iter().filter(|m| m.timestamp >= cutoff) {
            let bucket = &mut buckets[metric.timestamp.hour() as usize];
            bucket.calls += 1;
            bucket.cost += metric.cost;
        }
        buckets
    }

    /// Empirical success rate (0-100) for a provider over a trailing
    /// window, or `None` when no calls were recorded in it
    #[must_use]
    pub fn recent_success_rate(&self, provider: &str, window: Duration) -> Option<f64> {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(window).unwrap_or_else(|_| ChronoDuration::hours(1));
        let calls = self.calls.read();

        let mut total = 0u64;
        let mut succeeded = 0u64;
        for metric in calls
            .iter()
            .filter(|m| m.provider == provider && m.timestamp >= cutoff)
        {
            total += 1;
            if metric.success {
                succeeded += 1;
            }
        }

        if total == 0 {
            None
        } else {
            Some(succeeded as f64 / total as f64 * 100.0)
        }
    }

    /// Export the stored call log as CSV, oldest first
    #[must_use]
    pub fn export_csv(&self) -> String {
        let calls = self.calls.read();
        let mut out = String::from("timestamp,provider,operation,success,latency_ms,cost,error\n");
        for metric in calls.iter() {
            let error = metric.error.as_deref().unwrap_or("").replace(',', ";");
            out.push_str(&format!(
                "{},{},{},{},{},{:.4},{}\n",
                metric.timestamp.to_rfc3339(),
                metric.provider,
                metric.operation,
                metric.success,
                metric.latency_ms,
                metric.cost,
                error
            ));
        }
        out
    }

    /// Number of stored call records
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.read().len()
    }

    /// Whether no calls are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.read().is_empty()
    }

    /// Drop all stored records and counters
    pub fn clear(&self) {
        self.calls.write().clear();
        self.cache_hits.write().clear();
        self.cache_misses.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(provider: &str, success: bool, cost: f64, latency_ms: u64) -> UsageMetric {
        UsageMetric {
            provider: provider.to_string(),
            operation: Operation::SearchProcess,
            timestamp: Utc::now(),
            latency_ms,
            success,
            cost,
            error: (!success).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn ring_is_bounded_and_evicts_oldest_first() {
        let collector = MetricsCollector::new(3);
        for latency in 1..=5u64 {
            collector.record(metric("escavador", true, 0.1, latency));
        }

        assert_eq!(collector.len(), 3);
        let stored = collector.provider_metrics("escavador", None);
        let latencies: Vec<u64> = stored.iter().map(|m| m.latency_ms).collect();
        assert_eq!(latencies, vec![3, 4, 5]);
    }

    #[test]
    fn summary_aggregates_success_cost_and_latency() {
        let collector = MetricsCollector::with_defaults();
        collector.record(metric("escavador", true, 0.30, 100));
        collector.record(metric("escavador", false, 0.0, 300));
        collector.record(metric("judit", true, 0.90, 200));

        let all = collector.summary(None, None);
        assert_eq!(all.total_calls, 3);
        assert_eq!(all.successful_calls, 2);
        assert_eq!(all.failed_calls, 1);
        assert!((all.total_cost - 1.20).abs() < 1e-9);
        assert!((all.average_latency_ms - 200.0).abs() < 1e-9);

        let escavador = collector.summary(Some("escavador"), None);
        assert_eq!(escavador.total_calls, 2);
    }

    #[test]
    fn since_filter_excludes_older_records() {
        let collector = MetricsCollector::with_defaults();
        let mut old = metric("escavador", true, 1.0, 100);
        old.timestamp = Utc::now() - ChronoDuration::hours(3);
        collector.record(old);
        collector.record(metric("escavador", true, 2.0, 100));

        let recent = collector.summary(None, Some(Utc::now() - ChronoDuration::hours(1)));
        assert_eq!(recent.total_calls, 1);
        assert!((recent.total_cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cache_hit_rate_spans_operations() {
        let collector = MetricsCollector::with_defaults();
        collector.record_cache_hit(Operation::SearchProcess);
        collector.record_cache_hit(Operation::SearchPerson);
        collector.record_cache_miss(Operation::SearchProcess);
        collector.record_cache_miss(Operation::GetDocument);

        assert!((collector.cache_hit_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cost_breakdown_splits_by_provider_and_operation() {
        let collector = MetricsCollector::with_defaults();
        collector.record(metric("escavador", true, 0.30, 100));
        collector.record(metric("judit", true, 0.90, 100));

        let breakdown = collector.cost_breakdown(None);
        assert!((breakdown.total - 1.20).abs() < 1e-9);
        assert!((breakdown.by_provider["escavador"] - 0.30).abs() < 1e-9);
        assert!((breakdown.by_provider["judit"] - 0.90).abs() < 1e-9);
        assert!(
            (breakdown.by_operation[&Operation::SearchProcess] - 1.20).abs() < 1e-9
        );
    }

    #[test]
    fn error_rates_per_provider() {
        let collector = MetricsCollector::with_defaults();
        collector.record(metric("escavador", true, 0.0, 100));
        collector.record(metric("escavador", false, 0.0, 100));
        collector.record(metric("judit", true, 0.0, 100));

        let rates = collector.error_rates(None);
        assert!((rates["escavador"] - 0.5).abs() < 1e-9);
        assert!((rates["judit"] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn hourly_pattern_has_24_buckets() {
        let collector = MetricsCollector::with_defaults();
        collector.record(metric("escavador", true, 0.5, 100));

        let pattern = collector.hourly_usage_pattern(7);
        assert_eq!(pattern.len(), 24);
        let total_calls: u64 = pattern.iter().map(|b| b.calls).sum();
        assert_eq!(total_calls, 1);
    }

    #[test]
    fn recent_success_rate_uses_trailing_window() {
        let collector = MetricsCollector::with_defaults();
        assert!(collector
            .recent_success_rate("escavador", Duration::from_secs(3600))
            .is_none());

        let mut old = metric("escavador", false, 0.0, 100);
        old.timestamp = Utc::now() - ChronoDuration::hours(5);
        collector.record(old);
        collector.record(metric("escavador", true, 0.0, 100));

        let rate = collector
            .recent_success_rate("escavador", Duration::from_secs(3600))
            .unwrap();
        assert!((rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let collector = MetricsCollector::with_defaults();
        collector.record(metric("escavador", false, 0.0, 150));

        let csv = collector.export_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,provider,operation,success,latency_ms,cost,error"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("escavador"));
        assert!(row.contains("search_process"));
        assert!(row.contains("boom"));
    }
}
