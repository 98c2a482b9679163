//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`MetadataError`](crate::metadata::MetadataError),
//! [`MoveError`](crate::organizer::MoveError),
//! [`ConfigError`](crate::config::ConfigError)), while the CLI uses `anyhow`
//! for convenient error propagation.
//!
//! Per-file failures never reach this type during a run: the applier turns
//! them into failed [`ActionResult`](crate::model::ActionResult)s. [`Error`]
//! covers what can stop a run before it starts.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Audio directory missing or not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
