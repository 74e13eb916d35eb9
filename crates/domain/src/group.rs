//! Groups — addressable bulb zones and their capability model.
//!
//! A group is a zone of one or more bulbs controlled as a unit. The bulb
//! family determines which commands the zone understands: every family dims,
//! white-capable families take a color temperature, color-capable families
//! take a hue.

use serde::{Deserialize, Serialize};

/// Highest zone number a physical bridge addresses.
pub const MAX_ZONE: u8 = 4;

/// Bulb family of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Brightness only.
    Dimmer,
    /// Brightness and color temperature.
    White,
    /// Brightness and color.
    Rgbw,
    /// Brightness, color temperature, and color.
    Rgbww,
}

impl GroupKind {
    /// Whether the family accepts color-temperature commands.
    #[must_use]
    pub fn supports_temperature(self) -> bool {
        matches!(self, Self::White | Self::Rgbww)
    }

    /// Whether the family accepts hue commands.
    #[must_use]
    pub fn supports_color(self) -> bool {
        matches!(self, Self::Rgbw | Self::Rgbww)
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dimmer => f.write_str("dimmer"),
            Self::White => f.write_str("white"),
            Self::Rgbw => f.write_str("rgbw"),
            Self::Rgbww => f.write_str("rgbww"),
        }
    }
}

/// Identity of a group as seen by executors and encoders.
///
/// The engine treats this as opaque; only the capability predicates on
/// [`GroupKind`] influence behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// Zone number on the bridge (1–4).
    pub zone: u8,
    /// Caller-chosen name, used in logs and events.
    pub name: String,
    /// Bulb family.
    pub kind: GroupKind,
}

impl GroupDescriptor {
    /// Create a descriptor after validating the zone number.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidZone`] when `zone` is zero or above [`MAX_ZONE`].
    pub fn new(
        zone: u8,
        name: impl Into<String>,
        kind: GroupKind,
    ) -> Result<Self, InvalidZone> {
        if zone == 0 || zone > MAX_ZONE {
            return Err(InvalidZone { zone });
        }
        Ok(Self {
            zone,
            name: name.into(),
            kind,
        })
    }
}

impl std::fmt::Display for GroupDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (zone {})", self.name, self.zone)
    }
}

/// Zone number outside the bridge's addressable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("zone {zone} is outside the addressable range (1-4)")]
pub struct InvalidZone {
    /// The rejected zone number.
    pub zone: u8,
}
