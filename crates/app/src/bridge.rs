//! Bridge — composition root for one physical bridge.
//!
//! Owns the shared rate limiter, the transport, the encoder, and the event
//! bus, and spawns a [`GroupExecutor`] per addressable group. All groups
//! added here contend for the same send slots.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use glowctl_domain::event::BridgeEvent;
use glowctl_domain::group::GroupDescriptor;

use crate::event_bus::EventBus;
use crate::executor::GroupExecutor;
use crate::ports::{CommandEncoder, Transport};
use crate::scheduler::BridgeScheduler;

/// Event bus capacity; slow subscribers lag rather than block executors.
const EVENT_CAPACITY: usize = 256;

/// One physical bridge and the groups attached to it.
pub struct Bridge<T, E> {
    scheduler: Arc<BridgeScheduler>,
    transport: Arc<T>,
    encoder: E,
    events: EventBus,
}

impl<T, E> Bridge<T, E>
where
    T: Transport,
    E: CommandEncoder + Clone,
{
    /// Create a bridge enforcing `min_send_interval` between any two sends.
    #[must_use]
    pub fn new(transport: T, encoder: E, min_send_interval: Duration) -> Self {
        Self {
            scheduler: Arc::new(BridgeScheduler::new(min_send_interval)),
            transport: Arc::new(transport),
            encoder,
            events: EventBus::new(EVENT_CAPACITY),
        }
    }

    /// Spawn an executor for a group on this bridge.
    ///
    /// Executors returned here share this bridge's scheduler, transport, and
    /// event bus.
    #[must_use]
    pub fn add_group(&self, descriptor: GroupDescriptor) -> GroupExecutor {
        GroupExecutor::spawn(
            descriptor,
            Arc::clone(&self.scheduler),
            Arc::clone(&self.transport),
            self.encoder.clone(),
            self.events.clone(),
        )
    }

    /// Subscribe to lifecycle and failure events from all groups.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events.subscribe()
    }

    /// The shared transport for this bridge.
    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The shared scheduler for this bridge.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<BridgeScheduler> {
        &self.scheduler
    }

    /// The enforced minimum spacing between two sends.
    #[must_use]
    pub fn min_send_interval(&self) -> Duration {
        self.scheduler.min_interval()
    }
}
