//! Bridge scheduler — the shared rate limiter for one physical bridge.
//!
//! Every group executor attached to a bridge requests a send slot here
//! before forwarding a command to the transport. The scheduler guarantees a
//! minimum interval between any two sends regardless of originating group;
//! it is the only synchronization point shared across executors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default minimum spacing between two outbound commands.
pub const DEFAULT_MIN_SEND_INTERVAL: Duration = Duration::from_millis(100);

/// Serializes outbound sends on one physical bridge.
///
/// Holds the last-send timestamp behind a mutex; `acquire_slot` sleeps out
/// the remainder of the interval while holding the lock, so exactly one
/// sender passes per interval. Ties between waiting executors are broken by
/// runtime scheduler fairness, nothing more.
#[derive(Debug)]
pub struct BridgeScheduler {
    min_interval: Duration,
    last_send: Mutex<Option<Instant>>,
    active: AtomicUsize,
}

impl Default for BridgeScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SEND_INTERVAL)
    }
}

impl BridgeScheduler {
    /// Create a scheduler enforcing the given minimum send interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_send: Mutex::new(None),
            active: AtomicUsize::new(0),
        }
    }

    /// The enforced minimum spacing between two sends.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the interval since the previous send has elapsed, then
    /// claim the slot.
    pub async fn acquire_slot(&self) {
        let mut last_send = self.last_send.lock().await;
        if let Some(previous) = *last_send {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last_send = Some(Instant::now());
    }

    /// Record that a pipeline began executing on this bridge.
    ///
    /// The active count stretches transition step budgets so a single
    /// transition cannot monopolize the bridge under contention.
    pub fn pipeline_started(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    /// Record that a pipeline finished or was stopped.
    pub fn pipeline_finished(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    /// Number of pipelines currently executing across all groups.
    #[must_use]
    pub fn active_pipelines(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}
