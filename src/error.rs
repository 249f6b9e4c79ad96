//! Error types for the design studio

use thiserror::Error;

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating, editing, rendering or persisting designs
#[derive(Error, Debug)]
pub enum Error {
    /// A stored design is missing (or unreadable, which is reported the same way)
    #[error("Design not found: {0}")]
    NotFound(String),

    /// Reading or writing the design store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A design type string outside the known set
    #[error("Unknown design type: {0}")]
    InvalidDesignType(String),

    /// An edit targeted a primitive id that is not in the document
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An edit targeted a locked primitive
    #[error("Element is locked: {0}")]
    ElementLocked(String),

    /// Failed to render or encode an image
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Talking to the design API failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}

impl Error {
    /// Whether this error means "the thing asked for does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::ElementNotFound(_))
    }
}
