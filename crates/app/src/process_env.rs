//! The real process environment.

use crate::ports::Environment;

/// [`Environment`] backed by the current process.
///
/// Writes are visible to later `std::env::var` reads and inherited by child
/// processes spawned afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    #[allow(unsafe_code)]
    fn set_var(&self, key: &str, value: &str) {
        // SAFETY: the environment is process-global and updating it is the
        // purpose of this port. Keys and values were validated upstream, so
        // `set_var` cannot panic on `=` or NUL.
        unsafe { std::env::set_var(key, value) };
    }
}
