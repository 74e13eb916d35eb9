//! # glowctl-adapter-udp
//!
//! UDP transport adapter — delivers encoded commands to a physical lighting
//! bridge over a connected datagram socket.
//!
//! Bridges listen for small command datagrams and apply them on a
//! best-effort basis; because UDP is lossy, each command is resent a
//! configurable number of times (`reps`). The engine's rate limiter spaces
//! *logical* commands, repetitions ride inside one slot.
//!
//! ## Dependency rule
//!
//! Depends on `glowctl-app` (port traits) only.

mod config;

use std::future::Future;

use tokio::net::UdpSocket;

use glowctl_app::ports::{Transport, TransportError};

pub use config::{UdpBridgeConfig, UdpConfigError, DEFAULT_BRIDGE_PORT};

/// [`Transport`] over a connected UDP socket.
pub struct UdpTransport {
    socket: UdpSocket,
    reps: u8,
}

impl UdpTransport {
    /// Bind an ephemeral local socket and connect it to the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`UdpConfigError`] when the configuration is invalid or the
    /// socket cannot be bound or connected.
    pub async fn connect(config: &UdpBridgeConfig) -> Result<Self, UdpConfigError> {
        config.validate()?;
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(config.addr()).await?;
        Ok(Self {
            socket,
            reps: config.reps,
        })
    }
}

impl Transport for UdpTransport {
    fn send(&self, payload: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send {
        async move {
            for _ in 0..self.reps {
                self.socket.send(payload).await?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn listener() -> (UdpSocket, u16) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    #[tokio::test]
    async fn should_deliver_payload_to_the_bridge_address() {
        let (receiver, port) = listener().await;
        let config = UdpBridgeConfig {
            host: "127.0.0.1".to_string(),
            port,
            reps: 1,
            ..UdpBridgeConfig::default()
        };
        let transport = UdpTransport::connect(&config).await.unwrap();

        transport.send(b"hello").await.unwrap();

        let mut buf = [0u8; 16];
        let len = receiver.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"hello");
    }

    #[tokio::test]
    async fn should_repeat_each_send_reps_times() {
        let (receiver, port) = listener().await;
        let config = UdpBridgeConfig {
            host: "127.0.0.1".to_string(),
            port,
            reps: 3,
            ..UdpBridgeConfig::default()
        };
        let transport = UdpTransport::connect(&config).await.unwrap();

        transport.send(b"cmd").await.unwrap();

        let mut buf = [0u8; 16];
        for _ in 0..3 {
            let len = receiver.recv(&mut buf).await.unwrap();
            assert_eq!(&buf[..len], b"cmd");
        }
    }

    #[tokio::test]
    async fn should_reject_invalid_config_before_binding() {
        let config = UdpBridgeConfig {
            host: String::new(),
            ..UdpBridgeConfig::default()
        };
        let result = UdpTransport::connect(&config).await;
        assert!(matches!(result, Err(UdpConfigError::Validation(_))));
    }
}
