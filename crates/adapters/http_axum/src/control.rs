//! Control-plane endpoints — bridge HTTP requests to the control service.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::StatusCode;

use minipilot_app::ports::{Environment, EventBus};
use minipilot_app::services::control_service::ControlService;

use crate::adapter::Reply;
use crate::error::ApiError;

/// Largest request body read by default (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Stateless façade over a shared [`ControlService`].
///
/// `Clone` is implemented manually so the underlying service does not need
/// to be `Clone` — only the `Arc` is cloned.
pub struct Endpoints<B, E> {
    service: Arc<ControlService<B, E>>,
    body_limit: usize,
}

impl<B, E> Clone for Endpoints<B, E> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            body_limit: self.body_limit,
        }
    }
}

impl<B, E> Endpoints<B, E>
where
    B: EventBus + Send + Sync + 'static,
    E: Environment + Send + Sync + 'static,
{
    /// Create endpoints around a service instance.
    pub fn new(service: ControlService<B, E>) -> Self {
        Self::from_arc(Arc::new(service))
    }

    /// Create endpoints around a pre-wrapped `Arc` service.
    pub fn from_arc(service: Arc<ControlService<B, E>>) -> Self {
        Self {
            service,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Override the maximum body size; larger bodies are rejected with 422.
    #[must_use]
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    /// `POST /v3/environ` — set process environment variables from a JSON
    /// object of strings.
    pub async fn put_environ(&self, req: Request) -> Reply {
        let result = match read_body(req, self.body_limit).await {
            Ok(body) => self
                .service
                .update_environment(&body)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };
        finish(result)
    }

    /// `POST /v3/reload` — raise the reload flag and shut the bus down.
    ///
    /// The body is read and discarded.
    pub async fn post_reload(&self, req: Request) -> Reply {
        if let Err(err) = read_body(req, self.body_limit).await {
            tracing::debug!(error = %err, "control: ignoring unreadable reload body");
        }
        self.service.reload();
        (None, StatusCode::OK)
    }

    /// `POST /v3/metric` — publish one metric event per JSON entry.
    pub async fn post_metric(&self, req: Request) -> Reply {
        let result = match read_body(req, self.body_limit).await {
            Ok(body) => self.service.submit_metrics(&body).map_err(ApiError::from),
            Err(err) => Err(err),
        };
        finish(result)
    }
}

async fn read_body(req: Request, limit: usize) -> Result<Bytes, ApiError> {
    axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(ApiError::Body)
}

fn finish(result: Result<usize, ApiError>) -> Reply {
    match result {
        Ok(_) => (None, StatusCode::OK),
        Err(err) => err.into_reply(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use minipilot_app::event_bus::{BusState, InProcessEventBus};
    use minipilot_domain::event::{Event, EventKind};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    #[derive(Default)]
    struct InMemoryEnv {
        vars: Mutex<HashMap<String, String>>,
    }

    impl Environment for InMemoryEnv {
        fn set_var(&self, key: &str, value: &str) {
            self.vars
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }
    }

    struct Fixture {
        endpoints: Endpoints<Arc<InProcessEventBus>, Arc<InMemoryEnv>>,
        bus: Arc<InProcessEventBus>,
        env: Arc<InMemoryEnv>,
        rx: broadcast::Receiver<Event>,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(InProcessEventBus::new(16));
        let env = Arc::new(InMemoryEnv::default());
        let rx = bus.subscribe();
        let endpoints = Endpoints::new(ControlService::new(Arc::clone(&bus), Arc::clone(&env)));
        Fixture {
            endpoints,
            bus,
            env,
            rx,
        }
    }

    fn post(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test]
    async fn should_set_environment_and_reply_ok() {
        let f = fixture();

        let reply = f.endpoints.put_environ(post(r#"{"FOO":"bar"}"#)).await;

        assert_eq!(reply, (None, StatusCode::OK));
        assert_eq!(
            f.env.vars.lock().unwrap().get("FOO").map(String::as_str),
            Some("bar")
        );
    }

    #[tokio::test]
    async fn should_reply_unprocessable_for_malformed_environment() {
        let f = fixture();

        let reply = f.endpoints.put_environ(post("{")).await;

        assert_eq!(reply, (None, StatusCode::UNPROCESSABLE_ENTITY));
        assert!(f.env.vars.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reply_ok_and_set_storable_keys_when_some_are_unstorable() {
        let f = fixture();

        let reply = f
            .endpoints
            .put_environ(post(r#"{"GOOD":"y","A=B":"x"}"#))
            .await;

        assert_eq!(reply, (None, StatusCode::OK));
        let vars = f.env.vars.lock().unwrap();
        assert_eq!(vars.get("GOOD").map(String::as_str), Some("y"));
        assert!(!vars.contains_key("A=B"));
    }

    #[tokio::test]
    async fn should_reply_unprocessable_for_null_bodies() {
        let mut f = fixture();

        assert_eq!(
            f.endpoints.put_environ(post("null")).await,
            (None, StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert_eq!(
            f.endpoints.post_metric(post("null")).await,
            (None, StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert!(f.env.vars.lock().unwrap().is_empty());
        assert!(drain(&mut f.rx).is_empty());
    }

    #[tokio::test]
    async fn should_reply_unprocessable_when_body_exceeds_limit() {
        let f = fixture();
        let endpoints = f.endpoints.clone().with_body_limit(4);

        let reply = endpoints.put_environ(post(r#"{"FOO":"bar"}"#)).await;

        assert_eq!(reply, (None, StatusCode::UNPROCESSABLE_ENTITY));
        assert!(f.env.vars.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_publish_metrics_and_reply_ok() {
        let mut f = fixture();

        let reply = f
            .endpoints
            .post_metric(post(r#"{"cpu":42,"mem":"low"}"#))
            .await;

        assert_eq!(reply, (None, StatusCode::OK));
        let events = drain(&mut f.rx);
        assert_eq!(events.len(), 2);
        assert!(events.contains(&Event::new(EventKind::Metric, "cpu|42")));
        assert!(events.contains(&Event::new(EventKind::Metric, "mem|low")));
    }

    #[tokio::test]
    async fn should_publish_nothing_for_malformed_metrics() {
        let mut f = fixture();

        let reply = f.endpoints.post_metric(post("{")).await;

        assert_eq!(reply, (None, StatusCode::UNPROCESSABLE_ENTITY));
        assert!(drain(&mut f.rx).is_empty());
    }

    #[tokio::test]
    async fn should_shut_down_bus_with_reload_flag() {
        let mut f = fixture();

        let reply = f.endpoints.post_reload(post("ignored")).await;

        assert_eq!(reply, (None, StatusCode::OK));
        assert!(f.bus.is_reload());
        assert_eq!(f.bus.state(), BusState::ShuttingDown);
        assert_eq!(
            drain(&mut f.rx),
            vec![
                Event::signal(EventKind::Reload),
                Event::signal(EventKind::Shutdown)
            ]
        );
    }

    #[tokio::test]
    async fn should_reload_even_when_body_exceeds_limit() {
        let f = fixture();
        let endpoints = f.endpoints.clone().with_body_limit(1);

        let reply = endpoints.post_reload(post("too large")).await;

        assert_eq!(reply, (None, StatusCode::OK));
        assert!(f.bus.is_reload());
    }
}
