//! # minipilotd
//!
//! Library half of the daemon: configuration, logging setup and the
//! [`session::Session`] that serves the control plane for one bus lifetime.
//! `main.rs` only loops over sessions.

pub mod config;
pub mod logging;
pub mod session;
