/// Core error types for Cave Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Cave Player
///
/// This is the error vocabulary of the `LibraryService` and `CredentialStore`
/// seams. Transport-specific errors are converted into it by implementors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No bearer credential is available; the caller should redirect to login
    #[error("Authentication required")]
    AuthRequired,

    /// The stored credential could not be decoded or lacks the expected claims
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The request never produced a response (connect/timeout/transport)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server response could not be parsed
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credential storage failed
    #[error("Credential storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means the user has to log in again
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthRequired
                | Self::InvalidToken(_)
                | Self::Server {
                    status: 401 | 403,
                    ..
                }
        )
    }
}
