//! # Juris Routing
//!
//! Adaptive provider selection for the Juris Gateway.
//!
//! [`SelectionStrategy`] ranks the available providers for one operation
//! by a weighted score over price, rolling reliability, speed, and
//! feature fit, adjusted by recent observed performance and remaining
//! credits. Ranking is deterministic: equal inputs produce the same
//! order, and ties keep configuration order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod selection;

// Re-export main types
pub use selection::{ScoreBreakdown, ScoredProvider, SelectionStrategy};
