//! Transition planning — turning a transition stage into an interpolation
//! schedule.
//!
//! A plan is computed at execution time because it depends on the live group
//! state and on how many pipelines currently contend for the bridge. The
//! ideal step count comes from how far each targeted field has to travel;
//! under contention it is capped so a single transition cannot monopolize
//! the rate limiter.

use std::time::Duration;

use glowctl_domain::command::{DeviceCommand, TransitionTarget};
use glowctl_domain::state::GroupState;

/// Resolution of a full-range brightness or temperature sweep.
const LEVEL_STEPS: f64 = 25.0;

/// Interpolation schedule for one transition stage.
///
/// Values are emitted for step indices `first_index..=steps`: index 0 equals
/// the pre-transition state, index `steps` equals the target exactly, and
/// every targeted field moves linearly in between.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    steps: u32,
    first_index: u32,
    step_delay: Duration,
    brightness: Option<(f64, f64)>,
    temperature: Option<(f64, f64)>,
    hue: Option<(u8, u8)>,
}

impl TransitionPlan {
    /// Build a plan from the current state toward `target`.
    ///
    /// `min_interval` and `active` describe the bridge: the step count is
    /// capped at `duration / (min_interval × active)` so the transition
    /// leaves room for other pipelines. A zero `duration` jumps straight to
    /// the target in a single step.
    #[must_use]
    pub fn build(
        current: &GroupState,
        target: &TransitionTarget,
        duration: Duration,
        min_interval: Duration,
        active: usize,
    ) -> Self {
        let brightness = span(current.brightness, target.brightness);
        let temperature = span(current.temperature, target.temperature);
        let hue = target
            .hue
            .filter(|&end| end != current.hue)
            .map(|end| (current.hue, end));

        let ideal = ideal_steps(brightness, temperature, hue);
        if ideal == 0 {
            // Already at the target; nothing to send.
            return Self {
                steps: 0,
                first_index: 1,
                step_delay: Duration::ZERO,
                brightness: None,
                temperature: None,
                hue: None,
            };
        }

        if duration.is_zero() {
            return Self {
                steps: 1,
                first_index: 1,
                step_delay: Duration::ZERO,
                brightness,
                temperature,
                hue,
            };
        }

        let steps = ideal.min(affordable_steps(duration, min_interval, active)).max(1);
        Self {
            steps,
            first_index: 0,
            step_delay: duration / steps,
            brightness,
            temperature,
            hue,
        }
    }

    /// Whether the plan has nothing to send.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.steps == 0
    }

    /// Number of interpolation intervals.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// First step index to emit (1 for instant jumps, 0 otherwise).
    #[must_use]
    pub fn first_index(&self) -> u32 {
        self.first_index
    }

    /// Delay between consecutive steps.
    #[must_use]
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Device commands to send at the given step index.
    #[must_use]
    pub fn commands_at(&self, index: u32) -> Vec<DeviceCommand> {
        let mut commands = Vec::new();
        if let Some((start, end)) = self.brightness {
            commands.push(DeviceCommand::Brightness {
                level: self.value_at(start, end, index),
            });
        }
        if let Some((start, end)) = self.temperature {
            commands.push(DeviceCommand::Temperature {
                level: self.value_at(start, end, index),
            });
        }
        if let Some((start, end)) = self.hue {
            let value = self
                .value_at(f64::from(start), f64::from(end), index)
                .round() as u8;
            commands.push(DeviceCommand::Hue { value });
        }
        commands
    }

    /// Linear interpolation with exact endpoints.
    fn value_at(&self, start: f64, end: f64, index: u32) -> f64 {
        if index >= self.steps {
            return end;
        }
        start + (end - start) * f64::from(index) / f64::from(self.steps)
    }
}

fn span(current: f64, target: Option<f64>) -> Option<(f64, f64)> {
    target
        .filter(|&end| (end - current).abs() > f64::EPSILON)
        .map(|end| (current, end))
}

fn ideal_steps(
    brightness: Option<(f64, f64)>,
    temperature: Option<(f64, f64)>,
    hue: Option<(u8, u8)>,
) -> u32 {
    let levels = [brightness, temperature]
        .into_iter()
        .flatten()
        .map(|(start, end)| ((end - start).abs() * LEVEL_STEPS).ceil() as u32)
        .sum::<u32>();
    let hue = hue.map_or(0, |(start, end)| u32::from(start.abs_diff(end)));
    levels + hue
}

fn affordable_steps(duration: Duration, min_interval: Duration, active: usize) -> u32 {
    if min_interval.is_zero() {
        return u32::MAX;
    }
    let budget = min_interval.as_secs_f64() * active.max(1) as f64;
    let affordable = (duration.as_secs_f64() / budget).floor();
    if affordable >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        affordable as u32
    }
}
