//! Encoder port — pure byte-level encoding of device commands.
//!
//! Encodings vary per bulb family and bridge protocol version and are
//! entirely outside the engine's concern; callers supply an implementation
//! when constructing a [`Bridge`](crate::bridge::Bridge).

use glowctl_domain::command::DeviceCommand;
use glowctl_domain::group::GroupDescriptor;

/// Encodes one device command for one group.
///
/// Implementations must be pure: the same inputs always yield the same
/// bytes, with no side effects.
pub trait CommandEncoder: Send + Sync + 'static {
    /// Produce the wire bytes for `command` addressed at `group`.
    fn encode(&self, group: &GroupDescriptor, command: &DeviceCommand) -> Vec<u8>;
}
