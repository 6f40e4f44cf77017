//! Event bus port — publish/subscribe for control-plane events.

use std::sync::Arc;

use minipilot_domain::event::Event;

/// The operations the control plane needs from the process-wide bus.
///
/// None of these methods report failure: they signal, they do not wait for
/// subscribers. Implementations must tolerate concurrent calls.
pub trait EventBus {
    /// Deliver `event` to every current subscriber without blocking.
    ///
    /// Publishing after [`shutdown`](Self::shutdown) drops the event.
    fn publish(&self, event: Event);

    /// Mark the next shutdown as a reload. Idempotent.
    fn set_reload_flag(&self);

    /// Signal every subscriber to stop. Idempotent.
    fn shutdown(&self);
}

impl<T: EventBus + ?Sized> EventBus for Arc<T> {
    fn publish(&self, event: Event) {
        (**self).publish(event);
    }

    fn set_reload_flag(&self) {
        (**self).set_reload_flag();
    }

    fn shutdown(&self) {
        (**self).shutdown();
    }
}
