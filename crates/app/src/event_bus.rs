//! In-process event bus backed by a tokio broadcast channel.
//!
//! The bus lives for one supervisor session. Its lifecycle is tracked in a
//! [`watch`] cell so that the HTTP server and other long-running tasks can
//! await the transition out of [`BusState::Running`].

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, watch};

use minipilot_domain::event::{Event, EventKind};

use crate::ports::EventBus;

/// Lifecycle of an [`InProcessEventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusState {
    /// Events are delivered to subscribers.
    Running,
    /// Shutdown has been signalled; new events are dropped.
    ShuttingDown,
    /// The session owning the bus has finished tearing down.
    Stopped,
}

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
    state: watch::Sender<BusState>,
    reload: AtomicBool,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    ///
    /// A capacity of zero is clamped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let (state, _) = watch::channel(BusState::Running);
        Self {
            sender,
            state,
            reload: AtomicBool::new(false),
        }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> BusState {
        *self.state.borrow()
    }

    /// Whether the reload flag has been raised.
    #[must_use]
    pub fn is_reload(&self) -> bool {
        self.reload.load(Ordering::SeqCst)
    }

    /// Resolve once the bus has left [`BusState::Running`].
    pub async fn shutdown_requested(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|state| *state != BusState::Running).await;
    }

    /// Record that every subscriber has drained.
    pub fn mark_stopped(&self) {
        self.state.send_replace(BusState::Stopped);
        tracing::debug!("event bus stopped");
    }
}

impl EventBus for InProcessEventBus {
    fn publish(&self, event: Event) {
        // Hold the state read guard across the send: `shutdown` cannot flip
        // the state until it is released, so no event lands after `Shutdown`.
        let state = self.state.borrow();
        if *state != BusState::Running {
            drop(state);
            tracing::trace!(kind = %event.kind, "dropping event published after shutdown");
            return;
        }
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let _ = self.sender.send(event);
    }

    fn set_reload_flag(&self) {
        if !self.reload.swap(true, Ordering::SeqCst) {
            self.publish(Event::signal(EventKind::Reload));
        }
    }

    fn shutdown(&self) {
        let initiated = self.state.send_if_modified(|state| {
            if *state == BusState::Running {
                *state = BusState::ShuttingDown;
                true
            } else {
                false
            }
        });
        if initiated {
            tracing::info!(reload = self.is_reload(), "event bus shutting down");
            let _ = self.sender.send(Event::signal(EventKind::Shutdown));
        }
    }
}
