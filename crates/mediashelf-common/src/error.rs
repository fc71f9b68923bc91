//! Error taxonomy for the catalog pipeline.
//!
//! Only [`Error::LibraryNotFound`] and [`Error::PathNotAccessible`] ever reach
//! a caller of the catalog service. The remaining variants describe
//! per-entry enrichment failures that are logged and recovered locally.

use std::path::PathBuf;
use std::time::Duration;

/// Common error type for mediashelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The library index is outside the configured list.
    #[error("Library not found: {0}")]
    LibraryNotFound(usize),

    /// A filesystem read or stat failed, or the path escapes the library root.
    #[error("Path not accessible: {}: {source}", path.display())]
    PathNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external metadata provider could not be reached or rejected us.
    #[error("Metadata provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The external metadata provider returned zero results.
    #[error("No metadata match for: {0}")]
    EmptyMatch(String),

    /// A binary package could not be opened or parsed.
    #[error("Invalid package format: {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// A binary package does not carry an icon.
    #[error("No icon found in: {}", .0.display())]
    IconNotFound(PathBuf),

    /// Enrichment of a single entry exceeded its time budget.
    #[error("Timed out after {after:?} processing: {}", path.display())]
    Timeout { path: PathBuf, after: Duration },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a new PathNotAccessible error.
    pub fn path_not_accessible<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::PathNotAccessible {
            path: path.into(),
            source,
        }
    }

    /// Create a new Format error.
    pub fn format<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
