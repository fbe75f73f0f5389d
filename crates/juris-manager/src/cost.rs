//! Cost reporting and alert evaluation.

use chrono::{Duration as ChronoDuration, Utc};
use juris_config::CostAlertConfig;
use juris_core::Operation;
use juris_telemetry::{CostBreakdown, MetricsCollector};
use serde::Serialize;
use tracing::warn;

/// What a cost alert refers to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostAlertKind {
    /// Spend over the trailing hour exceeded the hourly cap
    Hourly,
    /// Spend over the trailing day exceeded the daily cap
    Daily,
    /// Spend for one operation over the trailing day exceeded its cap
    Operation(Operation),
}

/// One breached spending cap
#[derive(Debug, Clone, Serialize)]
pub struct CostAlert {
    /// Which cap was breached
    pub kind: CostAlertKind,
    /// Observed spend in BRL
    pub spent: f64,
    /// The configured cap in BRL
    pub cap: f64,
}

/// Cost totals with any breached caps
#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    /// Totals by provider and operation over the trailing day
    pub breakdown: CostBreakdown,
    /// Caps breached at evaluation time
    pub alerts: Vec<CostAlert>,
}

/// Evaluate the configured caps against recorded spend.
///
/// Unset caps never alert. Each breached cap is also logged at `warn`.
#[must_use]
pub fn evaluate(metrics: &MetricsCollector, config: &CostAlertConfig) -> Vec<CostAlert> {
    let now = Utc::now();
    let mut alerts = Vec::new();

    if let Some(cap) = config.hourly_cap {
        let spent = metrics
            .summary(None, Some(now - ChronoDuration::hours(1)))
            .total_cost;
        if spent > cap {
            alerts.push(CostAlert {
                kind: CostAlertKind::Hourly,
                spent,
                cap,
            });
        }
    }

    if let Some(cap) = config.daily_cap {
        let spent = metrics
            .summary(None, Some(now - ChronoDuration::days(1)))
            .total_cost;
        if spent > cap {
            alerts.push(CostAlert {
                kind: CostAlertKind::Daily,
                spent,
                cap,
            });
        }
    }

    if !config.operation_caps.is_empty() {
        let breakdown = metrics.cost_breakdown(Some(now - ChronoDuration::days(1)));
        for (operation, cap) in &config.operation_caps {
            let spent = breakdown.by_operation.get(operation).copied().unwrap_or(0.0);
            if spent > *cap {
                alerts.push(CostAlert {
                    kind: CostAlertKind::Operation(*operation),
                    spent,
                    cap: *cap,
                });
            }
        }
    }

    for alert in &alerts {
        warn!(
            kind = ?alert.kind,
            spent = alert.spent,
            cap = alert.cap,
            "cost cap exceeded"
        );
    }
    alerts
}
