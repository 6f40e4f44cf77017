//! # minipilotd — minipilot daemon
//!
//! Composition root that wires all adapters together and runs supervisor
//! sessions.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing`
//! - For each session: build a fresh event bus, the control service, the
//!   axum router, then bind and serve
//! - Stop the session when the bus shuts down (control-plane reload) or on
//!   Ctrl-C, and start a new one when the reload flag was raised
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use minipilotd::config::Config;
use minipilotd::logging;
use minipilotd::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let log_filter = logging::init(&config.logging.filter);

    loop {
        let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
        let reload = Session::new(&config).serve(listener).await?;
        if !reload {
            break;
        }
        tracing::info!("reloading configuration");
        config = Config::load()?;
        if let Err(err) = log_filter.apply(&config.logging.filter) {
            tracing::warn!(%err, "failed to apply reloaded log filter");
        }
    }

    tracing::info!("minipilotd stopped");
    Ok(())
}
