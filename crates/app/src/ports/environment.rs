//! Environment port — process-wide variable writes.

use std::sync::Arc;

/// Writes variables visible to the current process and its future children.
pub trait Environment {
    /// Set `key` to `value`, overwriting any previous value.
    ///
    /// Callers pass keys and values that already passed domain validation.
    fn set_var(&self, key: &str, value: &str);
}

impl<T: Environment + ?Sized> Environment for Arc<T> {
    fn set_var(&self, key: &str, value: &str) {
        (**self).set_var(key, value);
    }
}
