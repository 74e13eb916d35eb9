//! Preset pipelines for common lighting effects.
//!
//! Ready-made pipelines callers can enqueue as-is or extend with
//! [`Pipeline::append`]. Both run until a stop request.

use std::time::Duration;

use crate::command::{Command, TransitionTarget};
use crate::pipeline::Pipeline;

/// Hue of pure red on the 0–255 color wheel.
const RED: u8 = 0;
/// Hue of pure green.
const GREEN: u8 = 85;
/// Hue of pure blue.
const BLUE: u8 = 170;

/// Duration of each leg of the color loop.
const COLORLOOP_LEG: Duration = Duration::from_secs(10);

/// Half-period of the alarm flash.
const ALARM_PULSE: Duration = Duration::from_millis(250);

/// Endless red → green → blue color loop.
///
/// Requires a color-capable group.
#[must_use]
pub fn colorloop() -> Pipeline {
    // Window bounds and targets are constants in range, so the fallible
    // builder checks are skipped.
    [RED, GREEN, BLUE]
        .into_iter()
        .fold(Pipeline::new().on(), |pipeline, hue| {
            pipeline.push(Command::Transition {
                target: TransitionTarget::default().with_hue(hue),
                duration: COLORLOOP_LEG,
            })
        })
        .push(Command::Repeat {
            stages_back: 3,
            iterations: None,
        })
}

/// Endless red flash.
///
/// Requires a color-capable group.
#[must_use]
pub fn alarm() -> Pipeline {
    Pipeline::new()
        .on()
        .color(RED)
        .off()
        .wait(ALARM_PULSE)
        .on()
        .wait(ALARM_PULSE)
        .push(Command::Repeat {
            stages_back: 4,
            iterations: None,
        })
}
