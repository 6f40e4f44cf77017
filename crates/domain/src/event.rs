//! Event — an immutable record carried on the bus.
//!
//! Events are produced by the control plane (metric samples, reload and
//! shutdown signals) and by the supervisor session itself (startup).

use serde::Serialize;

/// Discriminates what an [`Event`] means to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A supervisor session has started.
    Startup,
    /// An externally observed metric sample; payload is `"<key>|<value>"`.
    Metric,
    /// The next shutdown is a reload rather than a terminal exit.
    Reload,
    /// Every subscriber should stop.
    Shutdown,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Startup => f.write_str("startup"),
            Self::Metric => f.write_str("metric"),
            Self::Reload => f.write_str("reload"),
            Self::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// An immutable `(kind, payload)` pair.
///
/// Events have no identity beyond their fields; two events with the same
/// kind and payload are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub payload: String,
}

impl Event {
    /// Create a new event.
    #[must_use]
    pub fn new(kind: EventKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// A lifecycle signal with an empty payload.
    #[must_use]
    pub fn signal(kind: EventKind) -> Self {
        Self::new(kind, String::new())
    }
}
