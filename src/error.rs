use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from listing or stat-ing the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A buffer position could not be mapped to a path, or a path could not
    /// be located in the buffer.
    #[error("Address resolution failed: {0}")]
    AddressResolution(String),

    /// The editor rejected a read, write, or address request.
    #[error("Editor protocol error: {0}")]
    EditorProtocol(String),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl AppError {
    pub(crate) fn address(msg: impl Into<String>) -> Self {
        AppError::AddressResolution(msg.into())
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        AppError::EditorProtocol(msg.into())
    }
}
