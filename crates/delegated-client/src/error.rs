//! Error types for delegated API operations

/// Errors from the token exchange and resource calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials failed the local precondition check before any request.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An operation ran before the step it depends on completed.
    #[error("out of sequence: {0}")]
    Sequence(&'static str),

    /// The response envelope reported `success: false`.
    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The envelope succeeded but `data` did not have the requested shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl Error {
    /// Server-supplied message for `Api` errors.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result alias for delegated client operations.
pub type Result<T> = std::result::Result<T, Error>;
