//! # minipilot-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Adapt plain `(Request) -> (payload, status)` functions into axum
//!   services that only accept `POST` ([`adapter::PostHandler`])
//! - Read request bodies and hand them to the control service
//!   ([`control::Endpoints`])
//! - Map application errors into HTTP status codes ([`error::ApiError`])
//! - Assemble the router ([`router::build`])
//!
//! ## Dependency rule
//! Depends on `minipilot-app` (for port traits and services) and
//! `minipilot-domain` (for error types). Never leaks axum types into the
//! domain.

pub mod adapter;
pub mod control;
pub mod error;
pub mod router;
