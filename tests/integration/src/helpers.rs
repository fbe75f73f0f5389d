//! Test helper utilities for integration tests

use juris_config::{CostAlertConfig, GatewayConfig, ProviderConfig};
use juris_manager::ProviderManager;
use juris_resilience::RetryConfig;
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A well-formed CNJ number in display form
pub const CNJ: &str = "0001234-56.2023.8.26.0100";
/// The same CNJ number as bare digits (cache-key form)
pub const CNJ_DIGITS: &str = "00012345620238260100";
/// A CPF-shaped person document
pub const CPF: &str = "123.456.789-09";
/// The same CPF as bare digits
pub const CPF_DIGITS: &str = "12345678909";

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Gateway configuration tuned for tests: three attempts per provider
/// with millisecond backoff and no jitter.
pub fn fast_config(providers: Vec<ProviderConfig>) -> GatewayConfig {
    GatewayConfig::new(providers).with_retry(RetryConfig {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2.0,
        jitter: 0.0,
    })
}

/// A running manager over the given provider configurations
pub fn manager_with(providers: Vec<ProviderConfig>) -> ProviderManager {
    init_tracing();
    ProviderManager::new(fast_config(providers)).expect("manager should start")
}

/// A running manager with cost alert caps applied
pub fn manager_with_cost_caps(
    providers: Vec<ProviderConfig>,
    cost_alerts: CostAlertConfig,
) -> ProviderManager {
    init_tracing();
    ProviderManager::new(fast_config(providers).with_cost_alerts(cost_alerts))
        .expect("manager should start")
}
