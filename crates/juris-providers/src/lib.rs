//! # Juris Providers
//!
//! Provider adapters for the Juris Gateway.
//!
//! Each adapter translates one external legal-data API into the normalized
//! domain model:
//! - Escavador: Bearer-token REST JSON
//! - Judit: REST JSON with HMAC-SHA256-signed request headers
//!
//! Adapters own their wire-to-domain mapping tables, rate limiting, and
//! rolling health state. Transport failures are translated into the
//! [`juris_core::JurisError`] taxonomy at this boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod escavador;
pub mod health;
pub mod judit;
pub mod registry;
mod transport;

// Re-export main types
pub use escavador::EscavadorProvider;
pub use health::HealthState;
pub use judit::JuditProvider;
pub use registry::build_providers;
