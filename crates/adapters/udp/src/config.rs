//! UDP bridge configuration.
//!
//! Port, repetition count, and send interval carry defaults matching common
//! bridge firmware; the host has no meaningful default and must be provided,
//! `validate()` rejects a configuration that omits it.

use serde::Deserialize;

/// Port most bridge firmware versions listen on.
pub const DEFAULT_BRIDGE_PORT: u16 = 8899;

/// Configuration for one physical bridge reachable over UDP.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UdpBridgeConfig {
    /// Bridge IP address or hostname. Required; there is no usable default.
    pub host: String,
    /// Bridge UDP port.
    pub port: u16,
    /// How many times to resend each command datagram.
    pub reps: u8,
    /// Minimum spacing between two logical commands, in milliseconds.
    pub min_send_interval_ms: u64,
}

impl Default for UdpBridgeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_BRIDGE_PORT,
            reps: 3,
            min_send_interval_ms: 100,
        }
    }
}

impl UdpBridgeConfig {
    /// The `host:port` address of the bridge.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The minimum send interval as a [`std::time::Duration`].
    #[must_use]
    pub fn min_send_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.min_send_interval_ms)
    }

    /// Check semantic invariants.
    ///
    /// # Errors
    ///
    /// Returns [`UdpConfigError::Validation`] when the host is empty, the
    /// port is zero, or `reps` is zero.
    pub fn validate(&self) -> Result<(), UdpConfigError> {
        if self.host.is_empty() {
            return Err(UdpConfigError::Validation("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(UdpConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.reps == 0 {
            return Err(UdpConfigError::Validation(
                "reps must be at least one".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration and connection errors for the UDP adapter.
#[derive(Debug, thiserror::Error)]
pub enum UdpConfigError {
    /// Socket bind or connect failure.
    #[error("failed to reach the bridge")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid bridge configuration: {0}")]
    Validation(String),
}
