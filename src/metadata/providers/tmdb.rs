//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Per-request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metadata::provider::{MetadataProvider, MovieMatch, TvMatch};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: u64,
    name: Option<String>,
    poster_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// # Examples
///
/// ```no_run
/// use mediashelf::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new("your-api-key".into(), "en-US".into())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
    image_size: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider with the given API key and language.
    pub fn new(api_key: String, language: String) -> anyhow::Result<Self> {
        Self::with_timeout(api_key, language, DEFAULT_TIMEOUT)
    }

    /// Create a provider whose HTTP requests give up after `timeout`.
    pub fn with_timeout(
        api_key: String,
        language: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            api_key,
            language,
            base_url: TMDB_BASE_URL.to_string(),
            image_size: "original".to_string(),
            rate_limiter: RateLimiter::direct(Quota::per_second(REQUESTS_PER_SECOND)),
        })
    }

    /// Point the provider at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Default poster size segment, e.g. `"w500"`.
    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = size.into();
        self
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = match self.client.get(url).send().await {
                Ok(resp) => resp,
                Err(e) => anyhow::bail!(
                    "TMDB request failed: {}: {}",
                    self.redact(url),
                    self.redact(&e.to_string())
                ),
            };

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !resp.status().is_success() {
                anyhow::bail!(
                    "TMDB request returned {}: {}",
                    resp.status(),
                    self.redact(url)
                );
            }

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Strip the API key before a URL ends up in logs or error chains.
    fn redact(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            return url.to_string();
        }
        url.replace(urlencoding::encode(&self.api_key).as_ref(), "***")
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_movie(&self, title: &str) -> anyhow::Result<Vec<MovieMatch>> {
        let url = self.url("/search/movie", &[("query", title)]);
        debug!(title = title, "TMDB search movie");

        let body: TmdbSearchResponse<TmdbMovieSearchResult> = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB movie search response")?;

        Ok(body
            .results
            .into_iter()
            .map(|r| MovieMatch {
                id: r.id,
                title: r.title.unwrap_or_default(),
                release_date: r.release_date.filter(|d| !d.is_empty()),
                vote_average: r.vote_average.unwrap_or_default(),
                poster_path: r.poster_path,
                overview: r.overview.filter(|o| !o.is_empty()),
            })
            .collect())
    }

    async fn search_tv(&self, title: &str) -> anyhow::Result<Vec<TvMatch>> {
        let url = self.url("/search/tv", &[("query", title)]);
        debug!(title = title, "TMDB search TV");

        let body: TmdbSearchResponse<TmdbTvSearchResult> = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB TV search response")?;

        Ok(body
            .results
            .into_iter()
            .map(|r| TvMatch {
                id: r.id,
                name: r.name.unwrap_or_default(),
                poster_path: r.poster_path,
            })
            .collect())
    }

    fn image_url(&self, poster_path: &str, size: Option<&str>) -> String {
        let size = size.unwrap_or(&self.image_size);
        let path = if poster_path.starts_with('/') {
            poster_path.to_string()
        } else {
            format!("/{poster_path}")
        };
        format!("{TMDB_IMAGE_BASE}/{size}{path}")
    }
}
