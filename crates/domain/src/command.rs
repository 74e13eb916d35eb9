//! Commands — the actions a pipeline stage can describe.
//!
//! [`Command`] is the full pipeline vocabulary, including control-flow
//! constructs (`Transition`, `Wait`, `Repeat`, `Callback`) that never leave
//! the executor. [`DeviceCommand`] is the reduced, encodable subset that is
//! rate-limited and handed to the transport.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Zero-argument action supplied by the caller and invoked synchronously on
/// the executor's task. Failures are isolated: reported, never propagated.
#[derive(Clone)]
pub struct CallbackHandle(Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>);

impl CallbackHandle {
    /// Wrap a closure.
    pub fn new(action: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static) -> Self {
        Self(Arc::new(action))
    }

    /// Invoke the action.
    ///
    /// # Errors
    ///
    /// Propagates whatever the wrapped action returns; the executor catches
    /// and reports it.
    pub fn call(&self) -> anyhow::Result<()> {
        (self.0)()
    }
}

impl std::fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallbackHandle")
    }
}

/// Partial target state for a timed transition.
///
/// At least one field must be set; numeric fields are validated when the
/// transition stage is built.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionTarget {
    /// Target brightness (0.0–1.0).
    pub brightness: Option<f64>,
    /// Target color temperature (0.0–1.0).
    pub temperature: Option<f64>,
    /// Target hue (0–255).
    pub hue: Option<u8>,
}

impl TransitionTarget {
    /// Set the target brightness.
    #[must_use]
    pub fn with_brightness(mut self, level: f64) -> Self {
        self.brightness = Some(level);
        self
    }

    /// Set the target color temperature.
    #[must_use]
    pub fn with_temperature(mut self, level: f64) -> Self {
        self.temperature = Some(level);
        self
    }

    /// Set the target hue.
    #[must_use]
    pub fn with_hue(mut self, hue: u8) -> Self {
        self.hue = Some(hue);
        self
    }

    /// Check ranges and non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyTransition`] when no field is set, or
    /// [`PipelineError::LevelOutOfRange`] when a level falls outside 0.0–1.0.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.brightness.is_none() && self.temperature.is_none() && self.hue.is_none() {
            return Err(PipelineError::EmptyTransition);
        }
        for level in [self.brightness, self.temperature].into_iter().flatten() {
            check_level(level)?;
        }
        Ok(())
    }
}

/// Validate a brightness or temperature level.
///
/// # Errors
///
/// Returns [`PipelineError::LevelOutOfRange`] when `level` is NaN or falls
/// outside `0.0..=1.0`.
pub fn check_level(level: f64) -> Result<(), PipelineError> {
    if level.is_nan() || !(0.0..=1.0).contains(&level) {
        return Err(PipelineError::LevelOutOfRange { value: level });
    }
    Ok(())
}

/// One action within a pipeline stage.
#[derive(Debug, Clone)]
pub enum Command {
    /// Turn the group on.
    On,
    /// Turn the group off.
    Off,
    /// Set brightness (0.0–1.0).
    Brightness(f64),
    /// Set color temperature (0.0–1.0). White-capable groups only.
    Temperature(f64),
    /// Set hue (0–255). Color-capable groups only.
    Hue(u8),
    /// Smoothly interpolate group state toward `target` over `duration`.
    Transition {
        /// Partial state to reach.
        target: TransitionTarget,
        /// Total transition time.
        duration: Duration,
    },
    /// Suspend the pipeline for the given time.
    Wait(Duration),
    /// Rewind the stage cursor `stages_back` positions, `iterations` times.
    /// `None` repeats until the pipeline is stopped.
    Repeat {
        /// How many preceding stages form the replay window.
        stages_back: usize,
        /// Number of replays; `None` is unbounded.
        iterations: Option<u32>,
    },
    /// Invoke a caller-supplied action.
    Callback(CallbackHandle),
}

impl Command {
    /// Short name used in stage logs and capability errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Brightness(_) => "brightness",
            Self::Temperature(_) => "temperature",
            Self::Hue(_) => "color",
            Self::Transition { .. } => "transition",
            Self::Wait(_) => "wait",
            Self::Repeat { .. } => "repeat",
            Self::Callback(_) => "callback",
        }
    }
}

/// A concrete, encodable device command — the unit of rate limiting.
///
/// The executor lowers every stage to zero or more of these; control-flow
/// constructs never reach the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum DeviceCommand {
    /// Power on.
    On,
    /// Power off.
    Off,
    /// Brightness level (0.0–1.0).
    Brightness {
        /// The level to set.
        level: f64,
    },
    /// Color temperature level (0.0–1.0).
    Temperature {
        /// The level to set.
        level: f64,
    },
    /// Hue (0–255).
    Hue {
        /// The hue to set.
        value: u8,
    },
}
