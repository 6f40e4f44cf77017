//! HTTP error mapping for control-plane handlers.

use std::error::Error as _;

use axum::http::StatusCode;

use minipilot_domain::error::MiniPilotError;

use crate::adapter::Reply;

/// Failure of a control-plane handler, before it is reduced to a status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be read in full.
    #[error("failed to read request body")]
    Body(#[source] axum::Error),

    /// The body was read but the use-case rejected it.
    #[error(transparent)]
    Domain(#[from] MiniPilotError),
}

impl ApiError {
    /// Status code reported to the caller.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(_) | Self::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Reduce to a payload-less [`Reply`].
    ///
    /// The detail is logged rather than returned; the caller only sees the
    /// status.
    #[must_use]
    pub fn into_reply(self) -> Reply {
        let status = self.status();
        match self.source() {
            Some(source) => tracing::debug!(error = %self, %source, "control: request rejected"),
            None => tracing::debug!(error = %self, "control: request rejected"),
        }
        (None, status)
    }
}
