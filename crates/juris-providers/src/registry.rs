//! Adapter construction from configuration.

use juris_config::{HealthCheckConfig, ProviderConfig, ProviderKind};
use juris_core::{JurisError, JurisResult, LegalDataProvider};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::escavador::EscavadorProvider;
use crate::judit::JuditProvider;

/// Instantiate one adapter per provider entry, preserving configuration
/// order.
///
/// # Errors
/// Returns [`JurisError::Configuration`] when no providers are
/// configured, on a duplicate provider ID, or when an adapter rejects
/// its configuration.
pub fn build_providers(
    configs: &[ProviderConfig],
    health: &HealthCheckConfig,
) -> JurisResult<Vec<Arc<dyn LegalDataProvider>>> {
    if configs.is_empty() {
        return Err(JurisError::configuration("no providers configured"));
    }

    let mut seen = HashSet::new();
    let mut providers: Vec<Arc<dyn LegalDataProvider>> = Vec::with_capacity(configs.len());
    for config in configs {
        if !seen.insert(config.id.clone()) {
            return Err(JurisError::configuration(format!(
                "duplicate provider id '{}'",
                config.id
            )));
        }
        let provider: Arc<dyn LegalDataProvider> = match config.kind {
            ProviderKind::Escavador => {
                Arc::new(EscavadorProvider::new(config.clone(), health)?)
            }
            ProviderKind::Judit => Arc::new(JuditProvider::new(config.clone(), health)?),
        };
        info!(provider = %config.id, "registered provider adapter");
        providers.push(provider);
    }
    Ok(providers)
}
