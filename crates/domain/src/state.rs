//! Group state — the light state owned by a group's executor.
//!
//! Only the executor task mutates this; external readers observe snapshots
//! published through a watch channel.

use serde::{Deserialize, Serialize};

use crate::command::DeviceCommand;

/// Current light state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupState {
    /// Whether the group is powered on.
    pub on: bool,
    /// Brightness (0.0–1.0).
    pub brightness: f64,
    /// Color temperature (0.0–1.0).
    pub temperature: f64,
    /// Hue (0–255).
    pub hue: u8,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            on: false,
            brightness: 0.5,
            temperature: 0.5,
            hue: 0,
        }
    }
}

impl GroupState {
    /// Apply a device command to the state.
    pub fn apply(&mut self, command: &DeviceCommand) {
        match command {
            DeviceCommand::On => self.on = true,
            DeviceCommand::Off => self.on = false,
            DeviceCommand::Brightness { level } => self.brightness = *level,
            DeviceCommand::Temperature { level } => self.temperature = *level,
            DeviceCommand::Hue { value } => self.hue = *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_off_at_half_brightness() {
        let state = GroupState::default();
        assert!(!state.on);
        assert!((state.brightness - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_apply_power_commands() {
        let mut state = GroupState::default();
        state.apply(&DeviceCommand::On);
        assert!(state.on);
        state.apply(&DeviceCommand::Off);
        assert!(!state.on);
    }

    #[test]
    fn should_apply_level_commands() {
        let mut state = GroupState::default();
        state.apply(&DeviceCommand::Brightness { level: 0.7 });
        state.apply(&DeviceCommand::Temperature { level: 0.2 });
        state.apply(&DeviceCommand::Hue { value: 200 });
        assert!((state.brightness - 0.7).abs() < f64::EPSILON);
        assert!((state.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(state.hue, 200);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let state = GroupState {
            on: true,
            brightness: 0.25,
            temperature: 0.75,
            hue: 42,
        };
        let json = serde_json::to_string(&state).unwrap();
        let parsed: GroupState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
