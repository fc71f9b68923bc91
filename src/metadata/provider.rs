//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait that external movie/TV
//! databases implement, along with the search result types the catalog reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A single movie returned from a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMatch {
    /// Provider-specific numeric identifier.
    pub id: u64,
    /// Canonical title.
    pub title: String,
    /// Release date as reported by the provider (usually `YYYY-MM-DD`).
    pub release_date: Option<String>,
    /// Audience rating on a 0-10 scale.
    pub vote_average: f64,
    /// Path fragment for the poster, resolved with [`MetadataProvider::image_url`].
    pub poster_path: Option<String>,
    /// Synopsis.
    pub overview: Option<String>,
}

/// A single TV show returned from a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvMatch {
    pub id: u64,
    pub name: String,
    pub poster_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait for an external movie/TV metadata service.
///
/// Results are returned in the provider's own order. Callers take the first
/// result; no ranking happens on this side. An empty list is a valid outcome,
/// errors are reserved for network, auth and decoding failures.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has been configured with valid
    /// credentials and is ready to serve requests.
    fn is_available(&self) -> bool;

    /// Search for movies matching `title`.
    async fn search_movie(&self, title: &str) -> anyhow::Result<Vec<MovieMatch>>;

    /// Search for TV shows matching `title`.
    async fn search_tv(&self, title: &str) -> anyhow::Result<Vec<TvMatch>>;

    /// Turn a poster path fragment into a displayable URL. `size` falls back
    /// to the provider's configured default when `None`.
    fn image_url(&self, poster_path: &str, size: Option<&str>) -> String;
}
