//! Function-to-service adapter for POST-only control endpoints.
//!
//! [`PostHandler`] lets a plain async function serve HTTP requests: it rejects
//! every method other than `POST` before the function runs, and renders the
//! function's [`Reply`] into exactly one response.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::Json;
use axum::extract::Request;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower::Service;

/// What a wrapped handler returns: an optional JSON payload and a status.
///
/// The payload is only rendered when the status is `200 OK`.
pub type Reply = (Option<serde_json::Value>, StatusCode);

/// Wraps a `Fn(Request) -> impl Future<Output = Reply>` as a [`Service`]
/// that can be mounted with [`axum::Router::route_service`].
#[derive(Clone)]
pub struct PostHandler<F> {
    handler: F,
}

impl<F> PostHandler<F> {
    /// Wrap `handler`.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F, Fut> Service<Request> for PostHandler<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future<Output = Reply> + Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        if req.method() != Method::POST {
            tracing::debug!(method = %req.method(), uri = %req.uri(), "rejecting non-POST control request");
            return Box::pin(std::future::ready(Ok(status_text(
                StatusCode::NOT_IMPLEMENTED,
            ))));
        }
        let reply = (self.handler)(req);
        Box::pin(async move { Ok(render(reply.await)) })
    }
}

/// Render a handler [`Reply`] into a response.
///
/// - `200` with a payload: the payload as `application/json`.
/// - `200` without a payload: an empty (single newline) body.
/// - anything else: the status with its reason phrase as body.
#[must_use]
pub fn render((payload, status): Reply) -> Response {
    if status != StatusCode::OK {
        return status_text(status);
    }
    match payload {
        Some(body) => (StatusCode::OK, Json(body)).into_response(),
        None => (StatusCode::OK, "\n").into_response(),
    }
}

fn status_text(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or_default();
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        format!("{reason}\n"),
    )
        .into_response()
}
