//! Error types for the Cave server client.

use cave_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to a Cave Player server.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available, or the server
    /// rejected the token
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// IO error in the credential file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential file is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServerClientError {
    /// Classify a transport failure, separating "server down" from other errors
    pub(crate) fn from_send(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ServerUnreachable(error.to_string())
        } else {
            Self::Request(error)
        }
    }
}

impl From<ServerClientError> for CoreError {
    fn from(error: ServerClientError) -> Self {
        match error {
            ServerClientError::AuthRequired => CoreError::AuthRequired,
            ServerClientError::ServerError { status, message } => {
                CoreError::Server { status, message }
            }
            ServerClientError::Request(e) => CoreError::Network(e.to_string()),
            ServerClientError::ServerUnreachable(msg) => CoreError::Network(msg),
            ServerClientError::InvalidUrl(msg) => CoreError::InvalidInput(msg),
            ServerClientError::ParseError(msg) => CoreError::Parse(msg),
            ServerClientError::Io(e) => CoreError::Storage(e.to_string()),
            ServerClientError::Serialization(e) => CoreError::Serialization(e),
        }
    }
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;
