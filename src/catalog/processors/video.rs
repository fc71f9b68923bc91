//! Movie and TV enrichment through an external metadata provider.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mediashelf_common::paths::classify_path;
use mediashelf_common::{Error, MediaKind, MediaType, Result};
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::catalog::entry::CatalogEntry;
use crate::catalog::processor::Processor;
use crate::metadata::{FilenameParser, MetadataProvider, MovieMatch, ParsedName, TvMatch};

/// What a lookup produced for one file. Misses are cached too, so the
/// provider is asked at most once per path.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoMatch {
    Movie {
        movie: MovieMatch,
        poster_url: Option<String>,
    },
    Show {
        show: TvMatch,
        poster_url: Option<String>,
        season: u32,
        episode: u32,
    },
    Unmatched,
}

/// Claims video files. Names with season and episode markers are looked up
/// as TV shows, everything else as movies. Only the first search result is
/// used.
pub struct VideoProcessor {
    provider: Option<Arc<dyn MetadataProvider>>,
    parser: Arc<dyn FilenameParser>,
    cache: ResultCache<VideoMatch>,
    timeout: Duration,
}

impl VideoProcessor {
    /// `provider` may be `None` when no metadata service is configured.
    pub fn new(
        provider: Option<Arc<dyn MetadataProvider>>,
        parser: Arc<dyn FilenameParser>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            parser,
            cache: ResultCache::new(),
            timeout,
        }
    }

    /// Cached outcome for `path`, if processed.
    pub fn cached(&self, path: &Path) -> Option<VideoMatch> {
        self.cache.get(path)
    }

    async fn lookup(&self, path: &Path) -> VideoMatch {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = self.parser.parse(&file_name);

        let Some(provider) = self.provider.as_deref().filter(|p| p.is_available()) else {
            debug!(path = %path.display(), "no metadata provider available");
            return VideoMatch::Unmatched;
        };

        match parsed.episode_marker() {
            Some((season, episode)) => {
                self.lookup_show(provider, path, &parsed, season, episode)
                    .await
            }
            None => self.lookup_movie(provider, path, &parsed).await,
        }
    }

    async fn lookup_movie(
        &self,
        provider: &dyn MetadataProvider,
        path: &Path,
        parsed: &ParsedName,
    ) -> VideoMatch {
        let outcome =
            tokio::time::timeout(self.timeout, provider.search_movie(&parsed.title)).await;
        match self.first(path, &parsed.title, outcome) {
            Some(movie) => {
                let poster_url = movie
                    .poster_path
                    .as_deref()
                    .map(|p| provider.image_url(p, None));
                debug!(path = %path.display(), title = %movie.title, id = movie.id, "matched movie");
                VideoMatch::Movie { movie, poster_url }
            }
            None => VideoMatch::Unmatched,
        }
    }

    async fn lookup_show(
        &self,
        provider: &dyn MetadataProvider,
        path: &Path,
        parsed: &ParsedName,
        season: u32,
        episode: u32,
    ) -> VideoMatch {
        let outcome = tokio::time::timeout(self.timeout, provider.search_tv(&parsed.title)).await;
        match self.first(path, &parsed.title, outcome) {
            Some(show) => {
                let poster_url = show
                    .poster_path
                    .as_deref()
                    .map(|p| provider.image_url(p, None));
                debug!(path = %path.display(), name = %show.name, id = show.id, "matched show");
                VideoMatch::Show {
                    show,
                    poster_url,
                    season,
                    episode,
                }
            }
            None => VideoMatch::Unmatched,
        }
    }

    /// First search result, logging why there is none.
    fn first<T>(
        &self,
        path: &Path,
        title: &str,
        outcome: std::result::Result<anyhow::Result<Vec<T>>, tokio::time::error::Elapsed>,
    ) -> Option<T> {
        let err = match outcome {
            Ok(Ok(results)) => match results.into_iter().next() {
                Some(first) => return Some(first),
                None => Error::EmptyMatch(title.to_string()),
            },
            Ok(Err(e)) => Error::ProviderUnavailable(format!("{e:#}")),
            Err(_) => Error::Timeout {
                path: path.to_path_buf(),
                after: self.timeout,
            },
        };

        match &err {
            Error::EmptyMatch(_) => debug!(path = %path.display(), error = %err, "no match"),
            _ => warn!(path = %path.display(), error = %err, "metadata lookup failed"),
        }
        None
    }
}

#[async_trait]
impl Processor for VideoProcessor {
    fn name(&self) -> &'static str {
        "video"
    }

    fn matches(&self, file_name: &str) -> bool {
        classify_path(Path::new(file_name)) == MediaKind::Video
    }

    async fn process(&self, path: &Path) -> Result<()> {
        self.cache
            .get_or_try_init(path, || async {
                Ok::<_, Error>(self.lookup(path).await)
            })
            .await?;
        Ok(())
    }

    fn describe(&self, entry: &mut CatalogEntry) {
        match self.cache.get(&entry.absolute_path) {
            Some(VideoMatch::Movie { movie, poster_url }) => {
                entry.media_type = MediaType::Movie;
                entry.name = movie.title;
                entry.line1 = movie.release_date.unwrap_or_default();
                entry.line2 = format!("{:.1}/10", movie.vote_average);
                if let Some(url) = poster_url {
                    entry.icon = url;
                }
                entry
                    .extras
                    .insert("provider_id".to_string(), movie.id.to_string());
                if let Some(overview) = movie.overview.filter(|o| !o.is_empty()) {
                    entry.extras.insert("overview".to_string(), overview);
                }
            }
            Some(VideoMatch::Show {
                show,
                poster_url,
                season,
                episode,
            }) => {
                entry.media_type = MediaType::TvShow;
                entry.name = show.name;
                if let Some(url) = poster_url {
                    entry.icon = url;
                }
                entry
                    .extras
                    .insert("provider_id".to_string(), show.id.to_string());
                entry.extras.insert("season".to_string(), season.to_string());
                entry
                    .extras
                    .insert("episode".to_string(), episode.to_string());
            }
            Some(VideoMatch::Unmatched) | None => {
                entry.media_type = MediaType::Video;
            }
        }
    }
}
