//! Unified error type for the planning board.
//!
//! Every fallible operation in `lotboard-core` returns [`BoardResult`]. The
//! variants mirror where user intent is expressed: a rejected input
//! ([`BoardError::Validation`]), a scenario name collision
//! ([`BoardError::DuplicateName`]), a missing scenario ([`BoardError::NotFound`])
//! and a failed feed load ([`BoardError::Initialization`]). The remaining
//! variants carry ambient failures from decoding, files and storage.
//!
//! # Example
//!
//! ```
//! use lotboard_core::{BoardError, BoardResult};
//!
//! fn require_name(name: &str) -> BoardResult<&str> {
//!     if name.trim().is_empty() {
//!         return Err(BoardError::Validation("scenario name cannot be empty".into()));
//!     }
//!     Ok(name)
//! }
//!
//! assert!(require_name("  ").is_err());
//! ```

use thiserror::Error;

/// Which external feed an initialization failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Projects,
    Requirements,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::Projects => write!(f, "project feed"),
            FeedKind::Requirements => write!(f, "requirement feed"),
        }
    }
}

/// Error type for all board operations.
#[derive(Error, Debug)]
pub enum BoardError {
    /// A user-supplied value failed a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// A scenario with this name already exists and overwrite was not requested
    #[error("scenario '{0}' already exists")]
    DuplicateName(String),

    /// The referenced scenario is not in storage
    #[error("scenario '{0}' not found")]
    NotFound(String),

    /// One of the external feeds could not be loaded
    #[error("failed to load {feed}: {source}")]
    Initialization {
        feed: FeedKind,
        #[source]
        source: Box<BoardError>,
    },

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors (feed files, scenario store files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key-value storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using BoardError.
pub type BoardResult<T> = Result<T, BoardError>;

impl BoardError {
    /// Wrap an error as an initialization failure of the given feed.
    pub fn initialization(feed: FeedKind, source: BoardError) -> Self {
        BoardError::Initialization {
            feed,
            source: Box::new(source),
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Parse(err.to_string())
    }
}

impl From<csv::Error> for BoardError {
    fn from(err: csv::Error) -> Self {
        BoardError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for BoardError {
    fn from(err: toml::de::Error) -> Self {
        BoardError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BoardError {
    fn from(err: toml::ser::Error) -> Self {
        BoardError::Config(err.to_string())
    }
}
