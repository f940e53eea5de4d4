//! Error types for vault and migration operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for vault lookup and migration operations
#[derive(Error, Debug)]
pub enum Error {
    /// The vault root is missing or not a directory. Raised before any other
    /// work happens.
    #[error("vault not found: {path} is not a directory")]
    VaultNotFound { path: PathBuf },

    /// The source note resolved to nothing, neither as a direct path nor via
    /// vault lookup.
    #[error("note not found: {name}")]
    NoteNotFound { name: String },

    /// A filesystem operation failed, with the path it failed on.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for vault and migration operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a vault-not-found error
    pub fn vault_not_found(path: impl Into<PathBuf>) -> Self {
        Self::VaultNotFound { path: path.into() }
    }

    /// Create a note-not-found error
    pub fn note_not_found(name: impl Into<String>) -> Self {
        Self::NoteNotFound { name: name.into() }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
