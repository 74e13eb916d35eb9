//! Pipelines — ordered, reusable sequences of stages.
//!
//! A pipeline is pure data: the chainable builder validates parameters as
//! stages are added and nothing executes until the pipeline is enqueued on a
//! group executor. Pipelines are cheap to clone and may be enqueued multiple
//! times or on multiple groups.

use std::time::Duration;

use crate::command::{check_level, CallbackHandle, Command, TransitionTarget};
use crate::error::{EnqueueError, PipelineError};
use crate::group::GroupKind;

/// One command within a pipeline.
///
/// Timing derivation for transitions (step count, per-step deltas) depends on
/// live group state and bridge contention, so it happens at execution time.
#[derive(Debug, Clone)]
pub struct Stage {
    command: Command,
}

impl Stage {
    /// The command this stage carries.
    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.command {
            Command::On | Command::Off | Command::Callback(_) => {
                write!(f, "{}()", self.command.name())
            }
            Command::Brightness(level) | Command::Temperature(level) => {
                write!(f, "{}({level})", self.command.name())
            }
            Command::Hue(value) => write!(f, "color({value})"),
            Command::Transition { duration, .. } => write!(f, "transition({duration:?})"),
            Command::Wait(duration) => write!(f, "wait({duration:?})"),
            Command::Repeat {
                stages_back,
                iterations,
            } => match iterations {
                Some(n) => write!(f, "repeat(stages={stages_back}, iterations={n})"),
                None => write!(f, "repeat(stages={stages_back}, forever)"),
            },
        }
    }
}

/// An ordered, appendable, repeatable sequence of stages.
///
/// Built through chainable operations; operations with validatable
/// parameters return `Result` and the chain composes with `?`:
///
/// ```
/// use std::time::Duration;
/// use glowctl_domain::command::TransitionTarget;
/// use glowctl_domain::pipeline::Pipeline;
///
/// # fn main() -> Result<(), glowctl_domain::error::PipelineError> {
/// let pipeline = Pipeline::new()
///     .on()
///     .brightness(0.7)?
///     .color(170)
///     .transition(
///         TransitionTarget::default().with_hue(0),
///         Duration::from_secs(3),
///     )?;
/// assert_eq!(pipeline.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a power-on stage.
    #[must_use]
    pub fn on(self) -> Self {
        self.push(Command::On)
    }

    /// Append a power-off stage.
    #[must_use]
    pub fn off(self) -> Self {
        self.push(Command::Off)
    }

    /// Append a brightness stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LevelOutOfRange`] when `level` is outside
    /// `0.0..=1.0`.
    pub fn brightness(self, level: f64) -> Result<Self, PipelineError> {
        check_level(level)?;
        Ok(self.push(Command::Brightness(level)))
    }

    /// Append a color-temperature stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LevelOutOfRange`] when `level` is outside
    /// `0.0..=1.0`.
    pub fn temperature(self, level: f64) -> Result<Self, PipelineError> {
        check_level(level)?;
        Ok(self.push(Command::Temperature(level)))
    }

    /// Append a hue stage.
    #[must_use]
    pub fn color(self, hue: u8) -> Self {
        self.push(Command::Hue(hue))
    }

    /// Append a timed transition stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyTransition`] when `target` sets no
    /// field, or [`PipelineError::LevelOutOfRange`] for out-of-range levels.
    pub fn transition(
        self,
        target: TransitionTarget,
        duration: Duration,
    ) -> Result<Self, PipelineError> {
        target.validate()?;
        Ok(self.push(Command::Transition { target, duration }))
    }

    /// Append a wait stage.
    #[must_use]
    pub fn wait(self, duration: Duration) -> Self {
        self.push(Command::Wait(duration))
    }

    /// Append a repeat stage replaying the previous `stages_back` stages
    /// `iterations` additional times.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] when either argument is zero or when
    /// `stages_back` exceeds the number of stages built so far.
    pub fn repeat(self, stages_back: usize, iterations: u32) -> Result<Self, PipelineError> {
        if iterations == 0 {
            return Err(PipelineError::RepeatZeroIterations);
        }
        self.push_repeat(stages_back, Some(iterations))
    }

    /// Append a repeat stage replaying the previous `stages_back` stages
    /// until the pipeline is stopped.
    ///
    /// Only meaningful as a terminal construct: stages after it run solely
    /// when a `stop()` request cuts the replay short.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] when `stages_back` is zero or exceeds the
    /// number of stages built so far.
    pub fn repeat_forever(self, stages_back: usize) -> Result<Self, PipelineError> {
        self.push_repeat(stages_back, None)
    }

    /// Append a callback stage.
    #[must_use]
    pub fn callback(self, handle: CallbackHandle) -> Self {
        self.push(Command::Callback(handle))
    }

    /// Concatenate another pipeline's stages after this one's.
    ///
    /// Stages are values; the result shares no mutable state with `other`.
    #[must_use]
    pub fn append(mut self, other: Self) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// The stage sequence.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline holds no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Verify every stage is within the capabilities of the given bulb
    /// family. Called by executors at enqueue time so capability mismatches
    /// never surface mid-execution.
    ///
    /// # Errors
    ///
    /// Returns [`EnqueueError::Unsupported`] naming the offending command.
    pub fn check_support(&self, kind: GroupKind) -> Result<(), EnqueueError> {
        for stage in &self.stages {
            let (wants_temperature, wants_color) = match stage.command() {
                Command::Temperature(_) => (true, false),
                Command::Hue(_) => (false, true),
                Command::Transition { target, .. } => {
                    (target.temperature.is_some(), target.hue.is_some())
                }
                _ => (false, false),
            };
            if wants_temperature && !kind.supports_temperature() {
                return Err(EnqueueError::Unsupported {
                    kind,
                    command: "temperature",
                });
            }
            if wants_color && !kind.supports_color() {
                return Err(EnqueueError::Unsupported {
                    kind,
                    command: "color",
                });
            }
        }
        Ok(())
    }

    pub(crate) fn push(mut self, command: Command) -> Self {
        self.stages.push(Stage { command });
        self
    }

    fn push_repeat(
        self,
        stages_back: usize,
        iterations: Option<u32>,
    ) -> Result<Self, PipelineError> {
        if stages_back == 0 {
            return Err(PipelineError::RepeatZeroStages);
        }
        if stages_back > self.stages.len() {
            return Err(PipelineError::RepeatBeyondStart {
                stages_back,
                available: self.stages.len(),
            });
        }
        Ok(self.push(Command::Repeat {
            stages_back,
            iterations,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_stages_in_order() {
        let pipeline = Pipeline::new()
            .on()
            .brightness(0.7)
            .unwrap()
            .color(170)
            .off();
        let names: Vec<_> = pipeline
            .stages()
            .iter()
            .map(|s| s.command().name())
            .collect();
        assert_eq!(names, ["on", "brightness", "color", "off"]);
    }

    #[test]
    fn should_reject_out_of_range_brightness() {
        let result = Pipeline::new().brightness(1.5);
        assert!(matches!(
            result,
            Err(PipelineError::LevelOutOfRange { .. })
        ));
    }

    #[test]
    fn should_reject_out_of_range_temperature() {
        assert!(Pipeline::new().temperature(-0.2).is_err());
    }

    #[test]
    fn should_reject_repeat_with_zero_stages() {
        let result = Pipeline::new().on().repeat(0, 3);
        assert!(matches!(result, Err(PipelineError::RepeatZeroStages)));
    }

    #[test]
    fn should_reject_repeat_with_zero_iterations() {
        let result = Pipeline::new().on().repeat(1, 0);
        assert!(matches!(result, Err(PipelineError::RepeatZeroIterations)));
    }

    #[test]
    fn should_reject_repeat_reaching_past_first_stage() {
        let result = Pipeline::new().on().off().repeat(3, 2);
        assert!(matches!(
            result,
            Err(PipelineError::RepeatBeyondStart {
                stages_back: 3,
                available: 2,
            })
        ));
    }

    #[test]
    fn should_accept_repeat_covering_whole_pipeline() {
        let pipeline = Pipeline::new().on().off().repeat(2, 5).unwrap();
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn should_reject_empty_transition_target() {
        let result =
            Pipeline::new().transition(TransitionTarget::default(), Duration::from_secs(1));
        assert!(matches!(result, Err(PipelineError::EmptyTransition)));
    }

    #[test]
    fn should_append_preserving_order() {
        let head = Pipeline::new().on().brightness(0.3).unwrap();
        let tail = Pipeline::new().wait(Duration::from_secs(1)).off();
        let combined = head.append(tail);
        let names: Vec<_> = combined
            .stages()
            .iter()
            .map(|s| s.command().name())
            .collect();
        assert_eq!(names, ["on", "brightness", "wait", "off"]);
    }

    #[test]
    fn should_not_alias_appended_stages() {
        let shared = Pipeline::new().on();
        let a = shared.clone().append(Pipeline::new().off());
        let b = shared.append(Pipeline::new().color(10));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
        assert_eq!(a.stages()[1].command().name(), "off");
        assert_eq!(b.stages()[1].command().name(), "color");
    }

    #[test]
    fn should_reject_color_on_white_group() {
        let pipeline = Pipeline::new().on().color(42);
        let result = pipeline.check_support(GroupKind::White);
        assert!(matches!(
            result,
            Err(EnqueueError::Unsupported {
                command: "color",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_temperature_on_rgbw_group() {
        let pipeline = Pipeline::new().temperature(0.4).unwrap();
        assert!(pipeline.check_support(GroupKind::Rgbw).is_err());
    }

    #[test]
    fn should_reject_transition_to_temperature_on_dimmer_group() {
        let pipeline = Pipeline::new()
            .transition(
                TransitionTarget::default().with_temperature(1.0),
                Duration::from_secs(2),
            )
            .unwrap();
        assert!(pipeline.check_support(GroupKind::Dimmer).is_err());
    }

    #[test]
    fn should_accept_full_vocabulary_on_rgbww_group() {
        let pipeline = Pipeline::new()
            .on()
            .brightness(0.9)
            .unwrap()
            .temperature(0.1)
            .unwrap()
            .color(200)
            .transition(
                TransitionTarget::default().with_brightness(0.0).with_hue(0),
                Duration::from_secs(1),
            )
            .unwrap();
        assert!(pipeline.check_support(GroupKind::Rgbww).is_ok());
    }

    #[test]
    fn should_display_stages_like_calls() {
        let pipeline = Pipeline::new()
            .on()
            .brightness(0.7)
            .unwrap()
            .repeat(2, 3)
            .unwrap();
        let rendered: Vec<_> = pipeline.stages().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            ["on()", "brightness(0.7)", "repeat(stages=2, iterations=3)"]
        );
    }
}
