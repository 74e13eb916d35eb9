//! # glowctl-adapter-virtual
//!
//! Virtual/demo adapter that provides a simulated bridge for testing and
//! demonstration purposes.
//!
//! | Piece | Behaviour |
//! |-------|-----------|
//! | [`RecordingTransport`] | Records every send with a timestamp instead of touching the network |
//! | [`DebugEncoder`] | Renders commands as readable bytes, e.g. `2:brightness=0.700` |
//!
//! Timestamps use [`tokio::time::Instant`] so tests running under a paused
//! clock observe deterministic spacing.
//!
//! ## Dependency rule
//!
//! Depends on `glowctl-app` (port traits) and `glowctl-domain` only.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::time::Instant;

use glowctl_app::ports::{CommandEncoder, Transport, TransportError};
use glowctl_domain::command::DeviceCommand;
use glowctl_domain::group::GroupDescriptor;

/// One recorded send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    /// When the transport was asked to deliver.
    pub at: Instant,
    /// The encoded bytes.
    pub payload: Vec<u8>,
}

/// [`Transport`] that records sends instead of delivering them.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    log: Mutex<Vec<SentCommand>>,
    fail_next: AtomicBool,
}

impl RecordingTransport {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentCommand> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded payloads rendered as strings, in send order.
    #[must_use]
    pub fn payloads(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|cmd| String::from_utf8_lossy(&cmd.payload).into_owned())
            .collect()
    }

    /// Recorded send timestamps, in send order.
    #[must_use]
    pub fn timestamps(&self) -> Vec<Instant> {
        self.sent().into_iter().map(|cmd| cmd.at).collect()
    }

    /// Number of recorded sends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been sent yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make the next send fail with an IO error (and record nothing).
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send {
        let result = if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(std::io::Error::other("simulated transport failure").into())
        } else {
            self.log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(SentCommand {
                    at: Instant::now(),
                    payload: payload.to_vec(),
                });
            Ok(())
        };
        async move { result }
    }
}

/// [`CommandEncoder`] producing readable `zone:command` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugEncoder;

impl CommandEncoder for DebugEncoder {
    fn encode(&self, group: &GroupDescriptor, command: &DeviceCommand) -> Vec<u8> {
        let rendered = match command {
            DeviceCommand::On => "on".to_string(),
            DeviceCommand::Off => "off".to_string(),
            DeviceCommand::Brightness { level } => format!("brightness={level:.3}"),
            DeviceCommand::Temperature { level } => format!("temperature={level:.3}"),
            DeviceCommand::Hue { value } => format!("hue={value}"),
        };
        format!("{}:{rendered}", group.zone).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use glowctl_domain::group::GroupKind;

    use super::*;

    fn group(zone: u8) -> GroupDescriptor {
        GroupDescriptor::new(zone, "test", GroupKind::Rgbww).unwrap()
    }

    #[tokio::test]
    async fn should_record_sends_in_order() {
        let transport = RecordingTransport::new();
        transport.send(b"first").await.unwrap();
        transport.send(b"second").await.unwrap();
        assert_eq!(transport.payloads(), ["first", "second"]);
    }

    #[tokio::test]
    async fn should_fail_exactly_one_send_after_fail_next() {
        let transport = RecordingTransport::new();
        transport.fail_next();
        assert!(transport.send(b"lost").await.is_err());
        assert!(transport.send(b"kept").await.is_ok());
        assert_eq!(transport.payloads(), ["kept"]);
    }

    #[tokio::test]
    async fn should_start_empty() {
        let transport = RecordingTransport::new();
        assert!(transport.is_empty());
    }

    #[test]
    fn should_render_power_commands_with_zone_prefix() {
        let encoder = DebugEncoder;
        assert_eq!(encoder.encode(&group(2), &DeviceCommand::On), b"2:on");
        assert_eq!(encoder.encode(&group(4), &DeviceCommand::Off), b"4:off");
    }

    #[test]
    fn should_render_levels_with_three_decimals() {
        let encoder = DebugEncoder;
        let bytes = encoder.encode(&group(1), &DeviceCommand::Brightness { level: 0.7 });
        assert_eq!(bytes, b"1:brightness=0.700");
    }

    #[test]
    fn should_render_hue_as_integer() {
        let encoder = DebugEncoder;
        let bytes = encoder.encode(&group(3), &DeviceCommand::Hue { value: 170 });
        assert_eq!(bytes, b"3:hue=170");
    }
}
