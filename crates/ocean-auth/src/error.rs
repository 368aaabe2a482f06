//! Error types for authentication.

use thiserror::Error;

/// Authentication-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No user is signed in.
    #[error("not signed in")]
    NotSignedIn,

    /// The key-value store refused an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored session could not be decoded.
    #[error("corrupt session data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
