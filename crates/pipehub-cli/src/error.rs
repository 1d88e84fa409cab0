use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pipehub_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Expected FIELD=VALUE, got '{0}'")]
    InvalidAssignment(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Session expired. Sign in again and run `pipehub auth login --cookie <name=value>`.")]
    SessionExpired,
    #[error("Failed to load the {0}; see the log above")]
    LoadFailed(&'static str),
    #[error("Settings were not saved ({0})")]
    SaveRejected(String),
    #[error("API key rotation failed; the current key is unchanged")]
    RotationFailed,
    #[error("Interrupted")]
    Cancelled,
}
