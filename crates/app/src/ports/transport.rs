//! Transport port — fire-and-forget delivery of encoded commands.
//!
//! The engine requests one send per rate-limit slot and treats each call as
//! fire-and-forget: a failed send is logged and reported on the event bus,
//! never retried, and never aborts the pipeline.

use std::future::Future;

/// Errors surfaced by a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying socket or channel failed.
    #[error("failed to deliver command")]
    Io(#[from] std::io::Error),
}

/// Delivers one encoded command to the physical bridge.
pub trait Transport: Send + Sync + 'static {
    /// Send a single encoded command.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on IO failure. The engine does not retry.
    fn send(&self, payload: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;
}
