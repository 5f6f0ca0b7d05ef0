//! Error types shared across every module in this crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, JuniperError>;

/// Flat error taxonomy covering every operation this crate exposes.
///
/// There is no retry, no partial result, and no silent truncation
/// anywhere in this crate's public operations: every lookup either
/// succeeds with a fully populated value or returns exactly one of
/// these variants. A verse whose stored length is zero is a success
/// (empty text), never [`JuniperError::NotFound`].
#[derive(Debug, Error)]
pub enum JuniperError {
    /// An expected file does not exist or could not be read.
    #[error("failed to open {path}: {source}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file's contents do not match the expected layout.
    #[error("malformed {what} in {path}: {reason}")]
    Malformed {
        /// Path of the offending file.
        path: PathBuf,
        /// What was being parsed (e.g. "block index record").
        what: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// A computed index, offset, or length fell outside its container.
    #[error("{what} {value} is out of range (0..{bound})")]
    OutOfRange {
        /// What was being addressed (e.g. "verse index").
        what: &'static str,
        /// The value that exceeded its bound.
        value: u64,
        /// The exclusive upper bound.
        bound: u64,
    },

    /// A zlib block failed to decompress, or decompressed to an
    /// unexpected length.
    #[error("failed to decompress block: {0}")]
    Decompression(String),

    /// A reference's book identifier is not recognised by the active
    /// versification system and has no KJV fallback.
    #[error("unknown book {0:?}")]
    UnknownBook(String),

    /// A dictionary or general-book key was not found.
    #[error("key not found: {0:?}")]
    NotFound(String),
}

impl JuniperError {
    /// Wraps an I/O error encountered while opening `path`.
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`JuniperError::Malformed`] for `path`.
    pub fn malformed(path: impl Into<PathBuf>, what: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            what,
            reason: reason.into(),
        }
    }

    /// Builds a [`JuniperError::OutOfRange`].
    #[must_use]
    pub const fn out_of_range(what: &'static str, value: u64, bound: u64) -> Self {
        Self::OutOfRange { what, value, bound }
    }
}
