//! Core type definitions for catalog entries.
//!
//! All enums serialize in lowercase so the JSON listing stays stable for
//! browser clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type reported for a catalog entry once it leaves the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A directory. Never enriched.
    Directory,
    /// A video file that has not (yet) been matched to a movie or show.
    Video,
    /// A video file matched to a movie.
    Movie,
    /// A video file matched to a TV show.
    TvShow,
    /// An audio track.
    Music,
    /// A still image.
    Image,
    /// Anything else.
    File,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Video => write!(f, "video"),
            Self::Movie => write!(f, "movie"),
            Self::TvShow => write!(f, "tvshow"),
            Self::Music => write!(f, "music"),
            Self::Image => write!(f, "image"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Hint derived purely from a file extension.
///
/// This is what [`crate::paths::classify`] returns; processors use it to
/// claim files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Music,
    Image,
    /// An installable application package (APK).
    Package,
    /// Unknown extension. The default, not an error.
    File,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Music => write!(f, "music"),
            Self::Image => write!(f, "image"),
            Self::Package => write!(f, "package"),
            Self::File => write!(f, "file"),
        }
    }
}
