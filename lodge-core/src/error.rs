/// Failures talking to the hosted data or storage API.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Could not decode backend response: {0}")]
    Decode(String),
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the request; the message is shown to the user as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("Not signed in")]
    NoSession,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Session storage failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Local storage is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Validation failed: {0} is required")]
    MissingField(&'static str),
}
