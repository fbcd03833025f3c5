//! Request failures surfaced to the table controller.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by [`RequestClient`](super::RequestClient) and the
/// endpoint bindings built on top of it.
///
/// The `Display` output is the human-readable reason shown to the user, so
/// `Status` renders only the reason extracted from the response.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a status other than 200.
    #[error("{reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 response whose body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A record sent for update carries no value for its primary key.
    #[error("Record has no '{field}' field")]
    MissingKey { field: String },

    /// The request URL could not be resolved against the base URL.
    #[error("Invalid URL '{url}'")]
    InvalidUrl { url: String },
}

impl RequestError {
    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => StatusCode::from_u16(*status).ok(),
            RequestError::Transport(err) => err.status(),
            _ => None,
        }
    }
}
