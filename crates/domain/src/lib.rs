//! # glowctl-domain
//!
//! Pure domain model for the glowctl lighting-bridge control engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Commands** (discrete actions: power, brightness, temperature,
//!   color, transitions, waits, repeats, callbacks)
//! - Define **Stages** and **Pipelines** (ordered, reusable command
//!   sequences built through a chainable, validating builder)
//! - Define **Groups** (addressable bulb zones and their capability model)
//! - Define **Group state** (on/off, brightness, temperature, hue)
//! - Define **Events** (execution lifecycle and failure notifications)
//! - Provide **Preset pipelines** for common effects (color loop, alarm)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod error;
pub mod event;
pub mod group;
pub mod id;
pub mod pipeline;
pub mod presets;
pub mod state;
pub mod time;
