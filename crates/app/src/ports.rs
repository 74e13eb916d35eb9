//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the execution engine and the outside
//! world. They are defined here (in `app`) so that both the engine and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod encoder;
pub mod transport;

pub use encoder::CommandEncoder;
pub use transport::{Transport, TransportError};
