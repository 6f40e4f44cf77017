//! Environment update — a decoded set of variables to apply to the process.
//!
//! Decoding is all-or-nothing: a malformed payload never yields an
//! [`EnvironmentUpdate`], so it never leaves the environment half-written.
//! Individual entries the platform cannot store are reported by
//! [`check_entry`] and skipped at apply time.

use std::collections::HashMap;

use crate::error::{MiniPilotError, ValidationError};

/// Decoded `key → value` pairs from a flat JSON string map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentUpdate {
    vars: HashMap<String, String>,
}

impl EnvironmentUpdate {
    /// Decode a JSON object of string values.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPilotError::Decode`] when the body is not a flat
    /// `string → string` object.
    pub fn from_json(body: &[u8]) -> Result<Self, MiniPilotError> {
        let vars: HashMap<String, String> = serde_json::from_slice(body)?;
        Ok(Self { vars })
    }

    /// Number of variables in the update.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the update carries no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Look up the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Check that `key=value` can be stored in the process environment.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEnvKey`] for an empty key or one holding
/// `=` or NUL, and [`ValidationError::InvalidEnvValue`] for a value holding
/// NUL.
pub fn check_entry(key: &str, value: &str) -> Result<(), ValidationError> {
    if key.is_empty() || key.contains('=') || key.contains('\0') {
        return Err(ValidationError::InvalidEnvKey(key.to_string()));
    }
    if value.contains('\0') {
        return Err(ValidationError::InvalidEnvValue(key.to_string()));
    }
    Ok(())
}
