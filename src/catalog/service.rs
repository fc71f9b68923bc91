//! The catalog facade used by the HTTP layer and the CLI.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mediashelf_common::{Error, MediaType, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::entry::{normalize_path, CatalogEntry, Library};
use super::index::{build_index, paginate, LibraryIndex};
use super::processor::{Processor, ProcessorRegistry};
use super::processors::{
    FallbackProcessor, ImageProcessor, MusicProcessor, PackageProcessor, VideoProcessor,
};
use super::scanner::{stat_entry, DirectoryScanner};
use crate::config::{CatalogConfig, CatalogMode, Config, IconConfig};
use crate::icons::IconStorage;
use crate::metadata::{FilenameParser, MetadataProvider, ReleaseNameParser, TmdbProvider};
use crate::package::{ApkExtractor, IconExtractor};

/// The standard processor order: video, music, image, package, fallback.
pub fn standard_registry(
    config: &Config,
    provider: Option<Arc<dyn MetadataProvider>>,
    parser: Arc<dyn FilenameParser>,
    extractor: Arc<dyn IconExtractor>,
) -> ProcessorRegistry {
    let storage = IconStorage::new(
        config.catalog.icon_cache_dir.clone(),
        config.icons.cache_route.clone(),
    );
    let video: Arc<dyn Processor> = Arc::new(VideoProcessor::new(
        provider,
        parser,
        config.catalog.enrichment_timeout(),
    ));
    let music: Arc<dyn Processor> = Arc::new(MusicProcessor::new(config.icons.clone()));
    let image: Arc<dyn Processor> = Arc::new(ImageProcessor::new());
    let package: Arc<dyn Processor> = Arc::new(PackageProcessor::new(
        extractor,
        storage,
        config.catalog.extraction_timeout(),
    ));
    let processors = vec![video, music, image, package];
    ProcessorRegistry::new(
        processors,
        Arc::new(FallbackProcessor::new(config.icons.clone())),
    )
}

/// Resolves libraries and produces enriched listings in either catalog
/// mode.
pub struct CatalogService {
    libraries: Vec<Library>,
    scanner: DirectoryScanner,
    indexes: Vec<Arc<LibraryIndex>>,
    settings: CatalogConfig,
    started: AtomicBool,
}

impl CatalogService {
    pub fn new(config: &Config, registry: ProcessorRegistry) -> Self {
        let libraries: Vec<Library> = config
            .libraries
            .iter()
            .enumerate()
            .map(|(id, lib)| Library::from_config(id, lib))
            .collect();
        let indexes = libraries
            .iter()
            .map(|_| Arc::new(LibraryIndex::new()))
            .collect();

        Self {
            scanner: DirectoryScanner::new(
                Arc::new(registry),
                config.icons.clone(),
                config.catalog.scan_concurrency,
            ),
            libraries,
            indexes,
            settings: config.catalog.clone(),
            started: AtomicBool::new(false),
        }
    }

    /// Wire up the production collaborators: TMDB (when a key is set), the
    /// release-name parser and the APK extractor.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Option<Arc<dyn MetadataProvider>> = if config.tmdb.api_key.is_empty() {
            info!("No TMDB API key configured, video entries will not be matched");
            None
        } else {
            let tmdb: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::with_timeout(
                config.tmdb.api_key.clone(),
                config.tmdb.language.clone(),
                config.catalog.enrichment_timeout(),
            )?
            .with_image_size(&config.tmdb.image_size));
            Some(tmdb)
        };

        let registry = standard_registry(
            config,
            provider,
            Arc::new(ReleaseNameParser::new()),
            Arc::new(ApkExtractor),
        );
        Ok(Self::new(config, registry))
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn mode(&self) -> CatalogMode {
        self.settings.mode
    }

    pub fn icons(&self) -> &IconConfig {
        self.scanner.icons()
    }

    /// Look up a library by index.
    pub fn library(&self, id: usize) -> Result<&Library> {
        self.libraries.get(id).ok_or(Error::LibraryNotFound(id))
    }

    /// Spawn one background walk per library. Does nothing in on-demand
    /// mode or when the walks were already started.
    pub fn start_background(&self) -> Vec<JoinHandle<()>> {
        if self.settings.mode != CatalogMode::Background {
            return Vec::new();
        }
        if self.started.swap(true, Ordering::AcqRel) {
            warn!("Background indexing already started, ignoring");
            return Vec::new();
        }
        self.libraries
            .iter()
            .zip(&self.indexes)
            .map(|(library, index)| {
                tokio::spawn(build_index(
                    library.clone(),
                    Arc::clone(index),
                    Arc::clone(self.scanner.registry()),
                    self.scanner.icons().clone(),
                    self.settings.scan_concurrency,
                ))
            })
            .collect()
    }

    /// Whether the background walk of a library has finished.
    pub fn is_indexed(&self, id: usize) -> Result<bool> {
        self.library(id)?;
        Ok(self.indexes[id].is_complete())
    }

    /// Enriched entries directly below `path`.
    ///
    /// Pagination applies only in background mode; on-demand listings
    /// return the whole directory.
    pub async fn list_library_path(
        &self,
        id: usize,
        path: &str,
        include_hidden: bool,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<CatalogEntry>> {
        let library = self.library(id)?;
        let relative = normalize_path(path)?;

        match self.settings.mode {
            CatalogMode::OnDemand => self.scanner.list(library, &relative, include_hidden).await,
            CatalogMode::Background => {
                let dir = stat_entry(library, &relative, self.scanner.icons()).await?;
                if dir.media_type != MediaType::Directory {
                    return Err(Error::path_not_accessible(
                        dir.absolute_path,
                        std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
                    ));
                }

                let children = self.indexes[id].children(&relative, include_hidden);
                let mut entries =
                    paginate(children, page, page_size, self.settings.default_page_size);
                let registry = self.scanner.registry();
                for entry in entries.iter_mut() {
                    registry.describe(entry);
                }
                debug!(library = id, path = %relative, count = entries.len(), "served from index");
                Ok(entries)
            }
        }
    }

    /// Absolute path of a regular file inside a library, for raw serving.
    pub async fn file_path(&self, id: usize, path: &str) -> Result<PathBuf> {
        let library = self.library(id)?;
        let relative = normalize_path(path)?;
        let absolute = library.resolve(&relative);
        let metadata = tokio::fs::metadata(&absolute)
            .await
            .map_err(|e| Error::path_not_accessible(&absolute, e))?;
        if !metadata.is_file() {
            return Err(Error::path_not_accessible(
                absolute,
                std::io::Error::new(std::io::ErrorKind::Other, "not a regular file"),
            ));
        }
        Ok(absolute)
    }

    /// One entry, freshly stat'ed and enriched.
    pub async fn get_entry(&self, id: usize, path: &str) -> Result<CatalogEntry> {
        let library = self.library(id)?;
        let relative = normalize_path(path)?;
        self.scanner.entry(library, &relative).await
    }
}
