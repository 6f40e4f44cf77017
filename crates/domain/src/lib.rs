//! # minipilot-domain
//!
//! Pure domain model for the minipilot control plane.
//!
//! ## Responsibilities
//! - Define **Events** (immutable `(kind, payload)` records carried on the bus)
//! - Define **Environment updates** (`key → value` sets decoded from
//!   control-plane requests)
//! - Define **Metric samples** (externally observed values rendered into event
//!   payloads)
//! - Error conventions shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod environment;
pub mod error;
pub mod event;
pub mod metric;
