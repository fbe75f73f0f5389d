//! # Juris Resilience
//!
//! Resilience primitives for the Juris Gateway:
//! - Fixed-window rate limiter guarding outbound provider calls
//! - Retry policy with exponential backoff for retryable errors

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod rate_limiter;
pub mod retry;

// Re-export main types
pub use rate_limiter::RateLimiter;
pub use retry::{RetryConfig, RetryPolicy, RetryPolicyBuilder};
