//! `tracing` subscriber setup with a filter that can be swapped on reload.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Handle to the live log filter.
pub struct FilterHandle(reload::Handle<EnvFilter, Registry>);

/// Build a reloadable filter layer for `filter` (`RUST_LOG` syntax).
#[must_use]
pub fn filter_layer(filter: &str) -> (reload::Layer<EnvFilter, Registry>, FilterHandle) {
    let (layer, handle) = reload::Layer::new(EnvFilter::new(filter));
    (layer, FilterHandle(handle))
}

/// Install the global subscriber: reloadable filter plus `fmt` output.
#[must_use]
pub fn init(filter: &str) -> FilterHandle {
    let (layer, handle) = filter_layer(filter);
    tracing_subscriber::registry()
        .with(layer)
        .with(tracing_subscriber::fmt::layer())
        .init();
    handle
}

impl FilterHandle {
    /// Replace the active filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriber owning the filter is gone.
    pub fn apply(&self, filter: &str) -> Result<(), reload::Error> {
        self.0.reload(EnvFilter::new(filter))
    }

    /// The active filter directives, if the subscriber is still alive.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.0.with_current(ToString::to_string).ok()
    }
}
