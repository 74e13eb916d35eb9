//! # glowctl-app
//!
//! Execution engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Transport` — deliver one encoded command to the physical bridge
//!   - `CommandEncoder` — pure byte-level encoding per bulb family
//! - Provide the **`BridgeScheduler`** — the shared rate limiter that spaces
//!   every outbound send on one physical bridge, regardless of group
//! - Provide the **`GroupExecutor`** — one tokio task per group that runs
//!   queued pipelines FIFO, expands repeats, interpolates transitions, and
//!   honors cooperative stop requests
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Provide the **`Bridge`** composition root wiring groups to one scheduler
//!
//! ## Dependency rule
//! Depends on `glowctl-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod bridge;
pub mod event_bus;
pub mod executor;
pub mod ports;
pub mod scheduler;
pub mod transition;
