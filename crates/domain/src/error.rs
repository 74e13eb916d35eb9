//! Common error types used across the workspace.
//!
//! Each concern keeps a focused `thiserror` enum; build-time validation
//! failures never surface mid-execution.

use crate::group::GroupKind;

/// Errors raised while building a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// Brightness or temperature level outside `0.0..=1.0`.
    #[error("level {value} is out of bounds (0.0-1.0)")]
    LevelOutOfRange {
        /// The rejected value.
        value: f64,
    },

    /// `repeat` called with `stages_back == 0`.
    #[error("repeat must cover at least one stage")]
    RepeatZeroStages,

    /// `repeat` called with `iterations == 0`.
    #[error("repeat must run at least one iteration")]
    RepeatZeroIterations,

    /// `repeat` references more stages than the pipeline holds so far.
    #[error("repeat reaches back {stages_back} stages but only {available} precede it")]
    RepeatBeyondStart {
        /// Requested window size.
        stages_back: usize,
        /// Stages present when `repeat` was called.
        available: usize,
    },

    /// A transition target with every field unset.
    #[error("transition target must set at least one field")]
    EmptyTransition,
}

/// Errors raised when enqueueing a pipeline on a group executor.
#[derive(Debug, thiserror::Error)]
pub enum EnqueueError {
    /// The pipeline uses a command the group's bulb family cannot perform.
    #[error("group kind {kind} does not support {command}")]
    Unsupported {
        /// The target group's bulb family.
        kind: GroupKind,
        /// Human-readable name of the offending command.
        command: &'static str,
    },

    /// The executor has been shut down and accepts no further pipelines.
    #[error("group executor has been shut down")]
    Closed,
}
