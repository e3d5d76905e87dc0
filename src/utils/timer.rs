//! Timer utilities
//!
//! Wall-clock measurement for checks and the per-probe deadline.

use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Simple timer for measuring elapsed time
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Stop timer and return elapsed milliseconds
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{}: {}ms", self.label, elapsed);
        elapsed
    }
}

/// Deadline owned by a single probe
///
/// A spawned sleep cancels the token once `timeout` elapses. Dropping the
/// deadline aborts the sleep, so no timer outlives the probe that owns it.
#[derive(Debug)]
pub struct Deadline {
    token: CancellationToken,
    timer: JoinHandle<()>,
    timeout: Duration,
}

impl Deadline {
    /// Arm a deadline; must be called inside a tokio runtime
    pub fn start(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            trigger.cancel();
        });

        Self {
            token,
            timer,
            timeout,
        }
    }

    /// Resolves once the deadline has passed
    pub fn expired(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

#[cfg(test)]
impl Deadline {
    fn is_expired(&self) -> bool {
        self.token.is_cancelled()
    }

    fn signal(&self) -> CancellationToken {
        self.token.clone()
    }
}
