//! Fixed-window rate limiter.
//!
//! Each provider adapter owns one limiter sized from its configured
//! request count and window period. Acquisition serializes the
//! check-and-decrement under a mutex; a caller that finds the window
//! exhausted sleeps until the window boundary and tries again.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Fixed-window token counter.
///
/// `capacity` tokens are granted per `window`; the window resets lazily on
/// the first acquisition attempt after the boundary. Tokens never go
/// negative.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug)]
struct WindowState {
    remaining: u32,
    window_start: Instant,
}

impl RateLimiter {
    /// Create a limiter granting `capacity` acquisitions per `window`.
    ///
    /// A zero capacity is clamped to 1 so the limiter can always make
    /// progress.
    #[must_use]
    pub fn new(capacity: u32, window: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            window,
            state: Mutex::new(WindowState {
                remaining: capacity,
                window_start: Instant::now(),
            }),
        }
    }

    /// Acquire a token, waiting for the next window when none remain.
    pub async fn acquire(&self) {
        loop {
            let deadline = {
                let mut state = self.state.lock();
                self.roll_window(&mut state);
                if state.remaining > 0 {
                    state.remaining -= 1;
                    None
                } else {
                    Some(state.window_start + self.window)
                }
            };

            match deadline {
                None => return,
                Some(deadline) => {
                    trace!(wait_ms = ?(deadline - Instant::now()), "rate limit window exhausted");
                    // The lock is not held across the sleep.
                    sleep_until(deadline).await;
                }
            }
        }
    }

    /// Acquire a token without waiting; returns false when the current
    /// window is exhausted.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.roll_window(&mut state);
        if state.remaining > 0 {
            state.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens remaining in the current window
    #[must_use]
    pub fn remaining(&self) -> u32 {
        let mut state = self.state.lock();
        self.roll_window(&mut state);
        state.remaining
    }

    /// Configured tokens per window
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Configured window length
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn roll_window(&self, state: &mut WindowState) {
        let now = Instant::now();
        if now.duration_since(state.window_start) >= self.window {
            state.remaining = self.capacity;
            state.window_start = now;
        }
    }
}
