//! Error types for pipehub-core

use thiserror::Error;

/// Result type alias using pipehub-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pipehub-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the entity shape
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid field input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown editable field name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Backend reported the session cookie is no longer valid
    #[error("Session expired; sign in again at {location}")]
    SessionExpired { location: String },

    /// Backend answered with a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
}
