//! One supervisor session: a fresh event bus and the control plane served on
//! top of it, until the bus shuts down.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use minipilot_adapter_http_axum::control::Endpoints;
use minipilot_adapter_http_axum::router;
use minipilot_app::event_bus::InProcessEventBus;
use minipilot_app::event_log;
use minipilot_app::ports::EventBus;
use minipilot_app::process_env::ProcessEnvironment;
use minipilot_app::services::control_service::ControlService;
use minipilot_domain::event::{Event, EventKind};

use crate::config::Config;

/// Fully wired session, ready to serve.
pub struct Session {
    bus: Arc<InProcessEventBus>,
    app: Router,
    events: broadcast::Receiver<Event>,
}

impl Session {
    /// Build the bus, the control service and the router from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        // Event bus
        let bus = Arc::new(InProcessEventBus::new(config.bus.capacity));
        let events = bus.subscribe();

        // Services
        let control_service = ControlService::new(Arc::clone(&bus), ProcessEnvironment);

        // HTTP
        let endpoints =
            Endpoints::new(control_service).with_body_limit(config.control.max_body_bytes);
        let app = router::build(endpoints);

        Self { bus, app, events }
    }

    /// The bus owned by this session.
    #[must_use]
    pub fn bus(&self) -> &Arc<InProcessEventBus> {
        &self.bus
    }

    /// Serve on `listener` until the bus leaves the running state or Ctrl-C
    /// arrives, then drain connections and mark the bus stopped.
    ///
    /// Returns whether the shutdown was a reload.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that stopped the server.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<bool> {
        let Self { bus, app, events } = self;
        let event_log = tokio::spawn(event_log::run(events));

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "minipilotd listening");
        }
        bus.publish(Event::signal(EventKind::Startup));

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(Arc::clone(&bus)))
            .await?;

        bus.mark_stopped();
        if let Err(err) = event_log.await {
            tracing::warn!(%err, "event log task failed");
        }

        let reload = bus.is_reload();
        tracing::info!(reload, "session ended");
        Ok(reload)
    }
}

/// Resolve when the bus leaves the running state, or shut it down on Ctrl-C.
async fn shutdown_signal(bus: Arc<InProcessEventBus>) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("received Ctrl-C, shutting down");
                bus.shutdown();
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = bus.shutdown_requested() => {}
        () = ctrl_c => {}
    }
}
