//! Error types for the Juris Gateway.
//!
//! Adapters translate raw transport failures into this taxonomy at the
//! boundary, so the orchestration layer never inspects transport-specific
//! errors. Classification drives the retry and fallback decisions.

use std::time::Duration;
use thiserror::Error;

/// Result type for gateway operations
pub type JurisResult<T> = Result<T, JurisError>;

/// Errors that can occur during gateway operations
#[derive(Debug, Error)]
pub enum JurisError {
    /// Provider rejected the configured credentials
    #[error("Authentication failed for provider '{provider}': {message}")]
    Authentication {
        /// Provider ID
        provider: String,
        /// Error message
        message: String,
    },

    /// Provider-side throttling (HTTP 429)
    #[error("Rate limited by provider '{provider}'")]
    RateLimited {
        /// Provider ID
        provider: String,
        /// Retry-After hint from the provider, if any
        retry_after: Option<Duration>,
    },

    /// Provider quota exhausted
    #[error("Insufficient credits on provider '{provider}' (remaining: {remaining:?})")]
    InsufficientCredits {
        /// Provider ID
        provider: String,
        /// Remaining credits as last reported
        remaining: Option<f64>,
    },

    /// Provider returned a 5xx or the request timed out; retryable
    #[error("Provider '{provider}' unavailable: {message}")]
    ProviderUnavailable {
        /// Provider ID
        provider: String,
        /// Error message
        message: String,
        /// HTTP status code, if the failure was an HTTP response
        status_code: Option<u16>,
    },

    /// Connection-level failure; retryable
    #[error("Network error calling provider '{provider}': {message}")]
    Network {
        /// Provider ID
        provider: String,
        /// Error message
        message: String,
    },

    /// Provider answered a well-formed request with a client error
    /// (404 and similar). Not retryable against the same provider, but
    /// provider coverage differs, so the fallback chain continues.
    #[error("Provider '{provider}' could not serve the request ({status_code}): {message}")]
    NotFound {
        /// Provider ID
        provider: String,
        /// Error message
        message: String,
        /// HTTP status code
        status_code: u16,
    },

    /// Malformed input (e.g. CNJ number format); not retryable, not
    /// eligible for fallback
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The offending field
        field: String,
        /// Error message
        message: String,
    },

    /// Invalid or incomplete configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Internal gateway error (serialization, task plumbing)
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },

    /// Every provider in the fallback chain was tried and failed
    #[error("All providers failed for '{operation}': {}", format_failures(.failures))]
    AllProvidersFailed {
        /// The operation that was attempted
        operation: String,
        /// Final failure per provider, in attempt order
        failures: Vec<ProviderFailure>,
    },
}

/// Final failure of one provider within an exhausted fallback chain
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    /// Provider ID
    pub provider: String,
    /// Rendered final error for that provider
    pub error: String,
}

fn format_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.provider, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl JurisError {
    /// Create an authentication error
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a provider-side rate limit error
    pub fn rate_limited(provider: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            retry_after,
        }
    }

    /// Create an insufficient-credits error
    pub fn insufficient_credits(provider: impl Into<String>, remaining: Option<f64>) -> Self {
        Self::InsufficientCredits {
            provider: provider.into(),
            remaining,
        }
    }

    /// Create a provider-unavailable error
    pub fn unavailable(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a network error
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self::NotFound {
            provider: provider.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the retry policy may re-attempt this error against the
    /// same provider
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::Network { .. }
        )
    }

    /// Whether a hard failure with this error may move on to the next
    /// provider in the fallback chain
    #[must_use]
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self, Self::Validation { .. })
    }

    /// The provider this error originated from, if any
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::InsufficientCredits { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::Network { provider, .. }
            | Self::NotFound { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
