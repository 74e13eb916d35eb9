//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use glowctl_domain::event::BridgeEvent;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Executors publish lifecycle and failure events here; publishing succeeds
/// even when there are no active subscribers (the event is simply dropped).
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after* the
    /// subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    /// Publish an event.
    pub fn publish(&self, event: BridgeEvent) {
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let _ = self.sender.send(event);
    }
}
