//! Background health monitoring.

use juris_core::LegalDataProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Periodic prober of every registered provider.
///
/// Each tick calls [`LegalDataProvider::check_health`] on every provider
/// in turn; adapters apply their own hysteresis to the probe outcomes.
/// Probes go through the adapter's rate limiter like any other call.
pub struct HealthMonitor;

impl HealthMonitor {
    /// Spawn the probe loop. The first round runs immediately.
    ///
    /// The returned handle aborts the loop when dropped by the owner via
    /// [`JoinHandle::abort`].
    pub fn spawn(
        providers: Vec<Arc<dyn LegalDataProvider>>,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                for provider in &providers {
                    let status = provider.check_health().await;
                    debug!(
                        provider = %status.provider,
                        healthy = status.healthy,
                        success_rate = status.success_rate,
                        avg_latency_ms = status.avg_latency_ms,
                        remaining_credits = ?status.remaining_credits,
                        "health probe completed"
                    );
                }
            }
        })
    }
}
