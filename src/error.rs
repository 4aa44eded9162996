//! Error type shared by the resolution engine and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for mention-resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by resolution, catalog lookup and bounded input reads.
///
/// The engine never recovers from any of these: the first error aborts the
/// in-flight resolution call and is handed back to the caller unchanged.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The media catalog failed to answer a lookup.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Popularity comparison hit an item that carries no popularity value.
    #[error("Missing popularity for media item '{identity}'")]
    MissingPopularity { identity: String },

    /// Input exceeded the configured character budget.
    #[error("Input too large: {} holds more than {max_chars} characters", .path.display())]
    InputTooLarge { path: PathBuf, max_chars: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not valid UTF-8.
    #[error("Invalid encoding in {}: {reason}", .path.display())]
    InvalidEncoding { path: PathBuf, reason: String },

    /// Configuration could not be loaded or written.
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog credentials were missing or the keyring refused access.
    #[error("Credential error: {0}")]
    Credentials(String),
}

impl Error {
    /// Create a lookup error.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Error::Lookup(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a credential error.
    pub fn credentials(msg: impl Into<String>) -> Self {
        Error::Credentials(msg.into())
    }
}
