//! Metric samples submitted through the control plane.

use serde_json::Value;

use crate::error::MiniPilotError;
use crate::event::{Event, EventKind};

/// One externally observed metric value, already rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    pub key: String,
    pub value: String,
}

impl MetricSample {
    /// Build a sample, rendering `value` to its default string form.
    ///
    /// JSON strings are taken verbatim; anything else uses its compact JSON
    /// text (`42`, `true`, `null`, `{"a":1}`). Floats keep serde's form, so
    /// `3.0` stays `3.0`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: &Value) -> Self {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            key: key.into(),
            value,
        }
    }

    /// Decode a JSON object into one sample per entry.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPilotError::Decode`] when the body is not a JSON object.
    pub fn parse_batch(body: &[u8]) -> Result<Vec<Self>, MiniPilotError> {
        let metrics: serde_json::Map<String, Value> = serde_json::from_slice(body)?;
        Ok(metrics
            .into_iter()
            .map(|(key, value)| Self::new(key, &value))
            .collect())
    }

    /// The `"<key>|<value>"` payload carried by metric events.
    #[must_use]
    pub fn payload(&self) -> String {
        format!("{}|{}", self.key, self.value)
    }
}

impl From<MetricSample> for Event {
    fn from(sample: MetricSample) -> Self {
        Event::new(EventKind::Metric, sample.payload())
    }
}
