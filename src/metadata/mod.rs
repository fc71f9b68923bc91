//! External metadata lookups used by the movie/TV processor.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`providers`] -- Concrete provider implementations (TMDB).
//! - [`filename`] -- Release-name parsing into title, season and episode.

pub mod filename;
pub mod provider;
pub mod providers;

pub use filename::{FilenameParser, ParsedName, ReleaseNameParser};
pub use provider::{MetadataProvider, MovieMatch, TvMatch};
pub use providers::TmdbProvider;
