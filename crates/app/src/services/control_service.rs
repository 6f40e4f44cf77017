//! Control service — use-cases behind the control-plane endpoints.

use minipilot_domain::environment::{self, EnvironmentUpdate};
use minipilot_domain::error::MiniPilotError;
use minipilot_domain::event::Event;
use minipilot_domain::metric::MetricSample;

use crate::ports::{Environment, EventBus};

/// Application service that turns decoded control requests into environment
/// writes and bus events.
///
/// Holds no state of its own beyond the injected ports, so a single instance
/// can serve any number of concurrent requests.
pub struct ControlService<B, E> {
    bus: B,
    env: E,
}

impl<B: EventBus, E: Environment> ControlService<B, E> {
    /// Create a new service publishing on `bus` and writing to `env`.
    pub fn new(bus: B, env: E) -> Self {
        Self { bus, env }
    }

    /// Apply a JSON object of string variables to the environment.
    ///
    /// The body is decoded in full before the first write. Entries the
    /// platform cannot store are skipped with a warning; the rest are set.
    /// Returns the number of variables written.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPilotError::Decode`] without touching the environment.
    pub fn update_environment(&self, body: &[u8]) -> Result<usize, MiniPilotError> {
        let update = EnvironmentUpdate::from_json(body)?;
        let mut written = 0;
        for (key, value) in update.iter() {
            if let Err(err) = environment::check_entry(key, value) {
                tracing::warn!(error = %err, "control: skipping environment variable");
                continue;
            }
            self.env.set_var(key, value);
            written += 1;
        }
        tracing::debug!(
            written,
            skipped = update.len() - written,
            "control: environment updated"
        );
        Ok(written)
    }

    /// Raise the reload flag, then shut the bus down.
    pub fn reload(&self) {
        tracing::debug!("control: reloading app via control plane");
        self.bus.set_reload_flag();
        self.bus.shutdown();
        tracing::debug!("control: reload signalled");
    }

    /// Publish one metric event per entry of a JSON object.
    ///
    /// Returns the number of events published.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPilotError::Decode`] without publishing anything.
    pub fn submit_metrics(&self, body: &[u8]) -> Result<usize, MiniPilotError> {
        let samples = MetricSample::parse_batch(body)?;
        let count = samples.len();
        for sample in samples {
            self.bus.publish(Event::from(sample));
        }
        tracing::debug!(count, "control: metrics published");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minipilot_domain::event::EventKind;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum BusCall {
        Publish(Event),
        SetReloadFlag,
        Shutdown,
    }

    #[derive(Default)]
    struct RecordingBus {
        calls: Mutex<Vec<BusCall>>,
    }

    impl RecordingBus {
        fn calls(&self) -> Vec<BusCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl EventBus for RecordingBus {
        fn publish(&self, event: Event) {
            self.calls.lock().unwrap().push(BusCall::Publish(event));
        }

        fn set_reload_flag(&self) {
            self.calls.lock().unwrap().push(BusCall::SetReloadFlag);
        }

        fn shutdown(&self) {
            self.calls.lock().unwrap().push(BusCall::Shutdown);
        }
    }

    #[derive(Default)]
    struct InMemoryEnv {
        vars: Mutex<HashMap<String, String>>,
        writes: Mutex<usize>,
    }

    impl InMemoryEnv {
        fn snapshot(&self) -> HashMap<String, String> {
            self.vars.lock().unwrap().clone()
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    impl Environment for InMemoryEnv {
        fn set_var(&self, key: &str, value: &str) {
            *self.writes.lock().unwrap() += 1;
            self.vars
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }
    }

    fn service() -> ControlService<RecordingBus, InMemoryEnv> {
        ControlService::new(RecordingBus::default(), InMemoryEnv::default())
    }

    #[test]
    fn should_set_every_variable_from_body() {
        let svc = service();

        let count = svc
            .update_environment(br#"{"FOO":"bar","PORT":"8080"}"#)
            .unwrap();

        assert_eq!(count, 2);
        let vars = svc.env.snapshot();
        assert_eq!(vars.get("FOO").map(String::as_str), Some("bar"));
        assert_eq!(vars.get("PORT").map(String::as_str), Some("8080"));
        assert!(svc.bus.calls().is_empty());
    }

    #[test]
    fn should_overwrite_existing_variable() {
        let svc = service();
        svc.update_environment(br#"{"FOO":"old"}"#).unwrap();
        svc.update_environment(br#"{"FOO":"new"}"#).unwrap();
        assert_eq!(
            svc.env.snapshot().get("FOO").map(String::as_str),
            Some("new")
        );
    }

    #[test]
    fn should_reach_same_state_when_update_repeated() {
        let body = br#"{"A":"1","B":"2"}"#;
        let once = service();
        once.update_environment(body).unwrap();
        let twice = service();
        twice.update_environment(body).unwrap();
        twice.update_environment(body).unwrap();
        assert_eq!(once.env.snapshot(), twice.env.snapshot());
    }

    #[test]
    fn should_not_touch_environment_when_body_is_malformed() {
        let svc = service();
        let result = svc.update_environment(b"{");
        assert!(matches!(result, Err(MiniPilotError::Decode(_))));
        assert_eq!(svc.env.writes(), 0);
    }

    #[test]
    fn should_not_touch_environment_when_any_value_is_not_a_string() {
        let svc = service();
        let result = svc.update_environment(br#"{"A":"1","B":2}"#);
        assert!(matches!(result, Err(MiniPilotError::Decode(_))));
        assert_eq!(svc.env.writes(), 0);
    }

    #[test]
    fn should_skip_unstorable_entries_and_set_the_rest() {
        let svc = service();

        let count = svc
            .update_environment(br#"{"GOOD":"y","A=B":"x","":"z","NUL":"a\u0000b"}"#)
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(svc.env.writes(), 1);
        let vars = svc.env.snapshot();
        assert_eq!(vars.get("GOOD").map(String::as_str), Some("y"));
        assert!(!vars.contains_key("A=B"));
        assert!(!vars.contains_key(""));
        assert!(!vars.contains_key("NUL"));
    }

    #[test]
    fn should_succeed_when_every_entry_is_unstorable() {
        let svc = service();
        assert_eq!(svc.update_environment(br#"{"":"x"}"#).unwrap(), 0);
        assert_eq!(svc.env.writes(), 0);
    }

    #[test]
    fn should_not_touch_environment_when_body_is_null() {
        let svc = service();
        let result = svc.update_environment(b"null");
        assert!(matches!(result, Err(MiniPilotError::Decode(_))));
        assert_eq!(svc.env.writes(), 0);
    }

    #[test]
    fn should_set_reload_flag_then_shutdown() {
        let svc = service();
        svc.reload();
        assert_eq!(
            svc.bus.calls(),
            vec![BusCall::SetReloadFlag, BusCall::Shutdown]
        );
    }

    #[test]
    fn should_signal_once_per_reload_call() {
        let svc = service();
        svc.reload();
        svc.reload();
        assert_eq!(
            svc.bus.calls(),
            vec![
                BusCall::SetReloadFlag,
                BusCall::Shutdown,
                BusCall::SetReloadFlag,
                BusCall::Shutdown
            ]
        );
    }

    #[test]
    fn should_publish_one_metric_event_per_entry() {
        let svc = service();

        let count = svc.submit_metrics(br#"{"cpu":42,"mem":"low"}"#).unwrap();

        assert_eq!(count, 2);
        let calls = svc.bus.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&BusCall::Publish(Event::new(EventKind::Metric, "cpu|42"))));
        assert!(calls.contains(&BusCall::Publish(Event::new(EventKind::Metric, "mem|low"))));
    }

    #[test]
    fn should_accept_any_json_value_type_for_metrics() {
        let svc = service();
        let count = svc
            .submit_metrics(br#"{"ok":true,"nested":{"a":[1,2]},"none":null}"#)
            .unwrap();
        assert_eq!(count, 3);
        assert!(svc.bus.calls().contains(&BusCall::Publish(Event::new(
            EventKind::Metric,
            r#"nested|{"a":[1,2]}"#
        ))));
    }

    #[test]
    fn should_publish_nothing_when_metric_body_is_malformed() {
        let svc = service();
        let result = svc.submit_metrics(b"{");
        assert!(matches!(result, Err(MiniPilotError::Decode(_))));
        assert!(svc.bus.calls().is_empty());
    }

    #[test]
    fn should_publish_nothing_when_metric_body_is_null() {
        let svc = service();
        let result = svc.submit_metrics(b"null");
        assert!(matches!(result, Err(MiniPilotError::Decode(_))));
        assert!(svc.bus.calls().is_empty());
    }

    #[test]
    fn should_publish_nothing_for_empty_metric_object() {
        let svc = service();
        assert_eq!(svc.submit_metrics(b"{}").unwrap(), 0);
        assert!(svc.bus.calls().is_empty());
    }
}
