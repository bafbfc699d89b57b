//! Error handling for the HTTP adapter.

use crate::config::ConfigError;
use conference_engine::RemoteError;

/// Errors raised while building an [`HttpRemote`](crate::HttpRemote).
///
/// Request failures are not reported here; they surface as
/// [`RemoteError`] through the sync engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Result type alias for adapter construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Classify a request failure for the engine.
pub(crate) fn remote_error(e: reqwest::Error) -> RemoteError {
    if e.is_decode() {
        RemoteError::Malformed(e.to_string())
    } else if let Some(status) = e.status() {
        RemoteError::Status(status.as_u16())
    } else {
        RemoteError::Transport(e.to_string())
    }
}
