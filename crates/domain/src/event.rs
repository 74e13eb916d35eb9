//! Events — execution lifecycle and failure notifications.
//!
//! Executors publish these on the bridge's event bus so callers can await
//! pipeline completion or observe send/callback failures without the
//! execution loop ever surfacing an error itself.

use serde::{Deserialize, Serialize};

use crate::id::PipelineId;
use crate::time::{now, Timestamp};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgeEventKind {
    /// A pipeline was dequeued and began executing.
    PipelineStarted,
    /// A pipeline ran all of its stages.
    PipelineCompleted,
    /// A pipeline was cut short by a stop request.
    PipelineStopped,
    /// The transport failed to deliver a command; execution continued.
    SendFailed {
        /// Rendered transport error.
        message: String,
    },
    /// A callback stage returned an error; execution continued.
    CallbackFailed {
        /// Rendered callback error.
        message: String,
    },
}

/// An event emitted by a group executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEvent {
    /// Name of the originating group.
    pub group: String,
    /// Zone number of the originating group.
    pub zone: u8,
    /// The pipeline run this event belongs to.
    pub pipeline: PipelineId,
    /// What happened.
    pub kind: BridgeEventKind,
    /// When the event was emitted.
    pub at: Timestamp,
}

impl BridgeEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(group: impl Into<String>, zone: u8, pipeline: PipelineId, kind: BridgeEventKind) -> Self {
        Self {
            group: group.into(),
            zone,
            pipeline,
            kind,
            at: now(),
        }
    }
}
