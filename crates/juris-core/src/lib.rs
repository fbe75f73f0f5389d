//! # Juris Core
//!
//! Core types, traits, and error handling for the Juris Gateway.
//!
//! This crate provides the foundational types used throughout the gateway:
//! - Normalized domain records (processes, persons, documents, movements)
//! - The provider trait and health/availability abstractions
//! - Error types and retry/fallback classification
//! - Per-call search options

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod domain;
pub mod error;
pub mod options;
pub mod provider;

// Re-export commonly used types
pub use domain::{
    Document, DocumentType, Movement, PartyRole, PersonDocumentType, PersonResult,
    ProcessResult, ProcessStatus, ProcessSummary, validate_cnj, validate_person_document,
};
pub use error::{JurisError, JurisResult, ProviderFailure};
pub use options::SearchOptions;
pub use provider::{HealthStatus, LegalDataProvider, Operation, ProviderFeature};
