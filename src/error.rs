//! Error types for the sharing service.

use thiserror::Error;

/// Operation-level errors surfaced to the caller.
///
/// Per-item mutation failures inside a submitted batch are not errors; they
/// are aggregated into the transfer report and logged.
#[derive(Debug, Error)]
pub enum SharingError {
    /// The operation refused to start: empty or malformed id or email.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requester is not the owner of the top-level target.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Network, auth, or transport failure talking to the storage provider.
    #[error("provider unavailable: {0}")]
    Provider(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A value could not be serialized for output.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for SharingError {
    fn from(err: reqwest::Error) -> Self {
        SharingError::Provider(err.to_string())
    }
}

impl From<serde_json::Error> for SharingError {
    fn from(err: serde_json::Error) -> Self {
        SharingError::Serialization(err.to_string())
    }
}
