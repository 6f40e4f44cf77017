//! Axum router assembly.

use axum::Router;
use axum::extract::Request;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use minipilot_app::ports::{Environment, EventBus};

use crate::adapter::PostHandler;
use crate::control::Endpoints;

/// Path of the environment-update endpoint.
pub const ENVIRON_PATH: &str = "/v3/environ";
/// Path of the reload endpoint.
pub const RELOAD_PATH: &str = "/v3/reload";
/// Path of the metric-submission endpoint.
pub const METRIC_PATH: &str = "/v3/metric";

/// Build the top-level axum [`Router`].
///
/// The three control paths are mounted as [`PostHandler`] services, so any
/// method other than `POST` is answered with `501` before the endpoint runs.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<B, E>(endpoints: Endpoints<B, E>) -> Router
where
    B: EventBus + Send + Sync + 'static,
    E: Environment + Send + Sync + 'static,
{
    let environ = endpoints.clone();
    let reload = endpoints.clone();
    let metric = endpoints;

    Router::new()
        .route("/health", get(health_check))
        .route_service(
            ENVIRON_PATH,
            PostHandler::new(move |req: Request| {
                let endpoints = environ.clone();
                async move { endpoints.put_environ(req).await }
            }),
        )
        .route_service(
            RELOAD_PATH,
            PostHandler::new(move |req: Request| {
                let endpoints = reload.clone();
                async move { endpoints.post_reload(req).await }
            }),
        )
        .route_service(
            METRIC_PATH,
            PostHandler::new(move |req: Request| {
                let endpoints = metric.clone();
                async move { endpoints.post_metric(req).await }
            }),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
