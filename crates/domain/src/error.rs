//! Common error types used across the workspace.

/// Top-level error for control-plane use-cases.
///
/// Each layer converts into this type via `#[from]`; no `String` variants.
#[derive(Debug, thiserror::Error)]
pub enum MiniPilotError {
    /// The request payload is not the JSON document the operation expects.
    #[error("malformed payload")]
    Decode(#[from] serde_json::Error),
}

/// Reasons a single decoded entry cannot be applied.
///
/// These never fail a request; the offending entry is skipped and logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Environment keys must be non-empty and free of `=` and NUL.
    #[error("invalid environment variable name {0:?}")]
    InvalidEnvKey(String),

    /// Environment values must be free of NUL.
    #[error("invalid value for environment variable {0:?}")]
    InvalidEnvValue(String),
}
