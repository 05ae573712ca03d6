//! Catalog reset error types.

use thiserror::Error;

/// Errors that can occur while resetting a catalog.
///
/// A 404 from the workspace API is never represented here: the API client
/// turns it into an absent result so deletes and existence probes stay
/// repeatable.
#[derive(Debug, Error)]
pub enum ResetError {
    /// No usable workspace host and token could be found.
    #[error("Credential error: {0}")]
    Credentials(String),

    /// The workspace API answered with a non-404 failure status.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response (timeout, connection, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A successful response carried a body that is not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ResetError {
    /// HTTP status for API failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResetError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ResetError {
    fn from(e: std::io::Error) -> Self {
        ResetError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ResetError {
    fn from(e: serde_json::Error) -> Self {
        ResetError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ResetError {
    fn from(e: reqwest::Error) -> Self {
        ResetError::Transport(e.to_string())
    }
}

impl From<envy::Error> for ResetError {
    fn from(e: envy::Error) -> Self {
        ResetError::Configuration(e.to_string())
    }
}
