//! The provider abstraction.
//!
//! Every external legal-data provider is wrapped in an adapter that
//! implements [`LegalDataProvider`], translating its wire shapes into the
//! normalized domain model and its transport failures into the
//! [`crate::JurisError`] taxonomy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Document, Movement, PersonResult, ProcessResult};
use crate::error::JurisResult;
use crate::options::SearchOptions;

/// The billable operations a provider can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Process lookup by CNJ number
    SearchProcess,
    /// Person lookup by CPF/CNPJ
    SearchPerson,
    /// Document retrieval by ID
    GetDocument,
    /// Movement tracking for a process
    TrackMovements,
}

impl Operation {
    /// Stable wire/metric name for the operation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SearchProcess => "search_process",
            Self::SearchPerson => "search_person",
            Self::GetDocument => "get_document",
            Self::TrackMovements => "track_movements",
        }
    }

    /// The feature a provider must support to serve this operation
    #[must_use]
    pub fn required_feature(self) -> ProviderFeature {
        match self {
            Self::SearchProcess => ProviderFeature::ProcessSearch,
            Self::SearchPerson => ProviderFeature::PersonSearch,
            Self::GetDocument => ProviderFeature::DocumentRetrieval,
            Self::TrackMovements => ProviderFeature::MovementTracking,
        }
    }

    /// All operations, in a stable order
    #[must_use]
    pub fn all() -> [Self; 4] {
        [
            Self::SearchProcess,
            Self::SearchPerson,
            Self::GetDocument,
            Self::TrackMovements,
        ]
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features a provider may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFeature {
    /// Process lookup by CNJ number
    ProcessSearch,
    /// Person lookup by CPF/CNPJ
    PersonSearch,
    /// Document retrieval
    DocumentRetrieval,
    /// Movement tracking
    MovementTracking,
    /// Push notifications for new movements
    WebhookNotifications,
    /// Bulk export of search results
    BulkExport,
}

/// A point-in-time health snapshot for one provider.
///
/// Rolling figures are computed over a trailing time window, not all-time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Provider ID
    pub provider: String,
    /// Whether the provider is currently considered healthy
    pub healthy: bool,
    /// When the snapshot was last refreshed
    pub last_check: DateTime<Utc>,
    /// Rolling average latency in milliseconds
    pub avg_latency_ms: f64,
    /// Rolling success rate, 0-100
    pub success_rate: f64,
    /// Remaining credits, when the provider reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<f64>,
    /// Total credit limit, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
}

impl HealthStatus {
    /// Fraction of credits remaining, when both figures are known
    #[must_use]
    pub fn credit_fraction(&self) -> Option<f64> {
        match (self.remaining_credits, self.credit_limit) {
            (Some(remaining), Some(limit)) if limit > 0.0 => Some(remaining / limit),
            _ => None,
        }
    }
}

/// Common interface implemented by every provider adapter.
///
/// All outbound calls pass through the adapter's rate limiter before
/// dispatch, and transport failures are translated into the error
/// taxonomy before they reach the caller.
#[async_trait]
pub trait LegalDataProvider: std::fmt::Debug + Send + Sync {
    /// Stable provider ID
    fn id(&self) -> &str;

    /// Look up a process by CNJ number
    async fn search_process(
        &self,
        number: &str,
        options: &SearchOptions,
    ) -> JurisResult<ProcessResult>;

    /// Look up a person by CPF/CNPJ
    async fn search_person(
        &self,
        document: &str,
        options: &SearchOptions,
    ) -> JurisResult<PersonResult>;

    /// Retrieve a document by provider-scoped ID
    async fn get_document(&self, id: &str, options: &SearchOptions) -> JurisResult<Document>;

    /// List movements for a process, optionally only those after `since`
    async fn track_movements(
        &self,
        process_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> JurisResult<Vec<Movement>>;

    /// Probe the provider and refresh the health snapshot.
    ///
    /// This is the only health path that performs I/O; it is driven by the
    /// background health monitor, never by request traffic.
    async fn check_health(&self) -> HealthStatus;

    /// Current health snapshot without any I/O
    fn health_snapshot(&self) -> HealthStatus;

    /// Estimated cost of `qty` calls of `operation`, in BRL
    fn estimate_cost(&self, operation: Operation, qty: u32) -> f64;

    /// Remaining credits as last reported, if the provider reports credits
    fn remaining_credits(&self) -> Option<f64>;

    /// Whether the provider supports a feature
    fn supports(&self, feature: ProviderFeature) -> bool;

    /// Cheap availability check: healthy and not out of credits
    fn is_available(&self) -> bool {
        let snapshot = self.health_snapshot();
        snapshot.healthy && self.remaining_credits().map_or(true, |c| c > 0.0)
    }
}
