//! Minimum-delay gate shared by every request an orchestrator makes
//!
//! The gate keeps one `last_request_time` and one `min_delay` behind a mutex.
//! Each caller reserves its dispatch slot inside the critical section
//! (`max(now, last + min_delay)`), records that slot as the new
//! `last_request_time`, then sleeps until the slot outside the lock. Because
//! the timestamp is taken at dispatch rather than on response, slow responses
//! never shrink the gap between two requests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct GateState {
    last_request_time: Option<Instant>,
    min_delay: Duration,
}

/// Serializes outbound requests to at most one per `min_delay`
#[derive(Debug)]
pub struct ThrottleGate {
    state: Mutex<GateState>,
}

impl ThrottleGate {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            state: Mutex::new(GateState {
                last_request_time: None,
                min_delay,
            }),
        }
    }

    /// Changes the minimum delay; applies from the next reservation on
    pub fn set_min_delay(&self, min_delay: Duration) {
        self.lock().min_delay = min_delay;
    }

    pub fn min_delay(&self) -> Duration {
        self.lock().min_delay
    }

    /// Waits until this caller may dispatch a request
    pub async fn wait(&self) {
        let wait = self.reserve(Instant::now());
        if !wait.is_zero() {
            tracing::trace!("Throttling request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Reserves the next dispatch slot and returns how long to wait for it
    fn reserve(&self, now: Instant) -> Duration {
        let mut state = self.lock();
        // A pending reservation may lie in the future, so measure from it
        // rather than from `now`.
        let slot = match state.last_request_time {
            Some(last) => (last + state.min_delay).max(now),
            None => now,
        };
        state.last_request_time = Some(slot);
        slot.saturating_duration_since(now)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
