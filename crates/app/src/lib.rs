//! # minipilot-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** the control plane drives:
//!   - `EventBus` — publish events, raise the reload flag, shut down
//!   - `Environment` — write process environment variables
//! - Define the **driving/inbound** use-case struct:
//!   - `ControlService` — update environment, reload, submit metrics
//! - Provide **in-process infrastructure** that doesn't need network IO
//!   (event bus, process environment, event log subscriber)
//!
//! ## Dependency rule
//! Depends on `minipilot-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod event_log;
pub mod ports;
pub mod process_env;
pub mod services;
