use thiserror::Error;

/// Errors returned by document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load credentials from {path}: {message}")]
    Credentials { path: String, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned HTTP {status} ({code}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Document {0} was modified concurrently")]
    Conflict(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Invalid Firestore endpoint: {0}")]
    Endpoint(String),
}

impl StoreError {
    /// True when a precondition on the write did not hold
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
