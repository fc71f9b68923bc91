//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which lays out a small library on disk and
//! builds a [`CatalogService`] around it with a counting stub provider.
//! [`TestHarness::with_server`] starts Axum on a random port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tempfile::TempDir;

use mediashelf::catalog::{standard_registry, CatalogService};
use mediashelf::config::{CatalogMode, Config, LibraryConfig};
use mediashelf::metadata::{MetadataProvider, MovieMatch, ReleaseNameParser, TvMatch};
use mediashelf::package::ApkExtractor;
use mediashelf::server::{create_router, AppContext};

/// Provider returning one fixed movie and one fixed show for every query.
#[derive(Default)]
pub struct FixedProvider {
    movie_calls: AtomicUsize,
    tv_calls: AtomicUsize,
}

impl FixedProvider {
    pub fn movie_calls(&self) -> usize {
        self.movie_calls.load(Ordering::SeqCst)
    }

    pub fn tv_calls(&self) -> usize {
        self.tv_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search_movie(&self, title: &str) -> anyhow::Result<Vec<MovieMatch>> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![MovieMatch {
            id: 27205,
            title: title.to_string(),
            release_date: Some("2010-07-16".into()),
            vote_average: 8.8,
            poster_path: Some("/poster.jpg".into()),
            overview: None,
        }])
    }

    async fn search_tv(&self, title: &str) -> anyhow::Result<Vec<TvMatch>> {
        self.tv_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![TvMatch {
            id: 1399,
            name: title.to_string(),
            poster_path: Some("/show.jpg".into()),
        }])
    }

    fn image_url(&self, poster_path: &str, _size: Option<&str>) -> String {
        format!("https://img.test/original{poster_path}")
    }
}

pub struct TestHarness {
    pub root: TempDir,
    pub config: Config,
    pub provider: Arc<FixedProvider>,
    pub catalog: Arc<CatalogService>,
}

impl TestHarness {
    /// A library at a fresh temp dir containing:
    ///
    /// ```text
    /// a/Inception.2010.1080p.mkv
    /// a/.hidden
    /// a/sub/
    /// shows/Foo.S01E02.mkv
    /// music/song.flac
    /// pics/cover.jpg
    /// notes.xyz
    /// ```
    pub fn new(mode: CatalogMode) -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        populate(root.path());

        let mut config = Config::default();
        config.libraries.push(LibraryConfig {
            name: "Media".into(),
            kind: "movies".into(),
            path: root.path().to_path_buf(),
        });
        config.catalog.mode = mode;
        config.catalog.icon_cache_dir = root.path().join(".icons");
        std::fs::create_dir_all(&config.catalog.icon_cache_dir).expect("failed to create icon dir");

        let provider = Arc::new(FixedProvider::default());
        let registry = standard_registry(
            &config,
            Some(provider.clone() as Arc<dyn MetadataProvider>),
            Arc::new(ReleaseNameParser::new()),
            Arc::new(ApkExtractor),
        );
        let catalog = Arc::new(CatalogService::new(&config, registry));

        Self {
            root,
            config,
            provider,
            catalog,
        }
    }

    pub fn router(&self) -> Router {
        create_router(AppContext {
            catalog: Arc::clone(&self.catalog),
            config: Arc::new(self.config.clone()),
        })
    }

    /// Run every background walk to completion.
    pub async fn index(&self) {
        for handle in self.catalog.start_background() {
            handle.await.expect("background walk panicked");
        }
    }

    /// Start an Axum server on a random port and return the bound address.
    pub async fn with_server(mode: CatalogMode) -> (Self, SocketAddr) {
        let harness = Self::new(mode);
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

fn populate(root: &Path) {
    for dir in ["a/sub", "shows", "music", "pics"] {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
    let files: [(&str, &[u8]); 6] = [
        ("a/Inception.2010.1080p.mkv", b"video"),
        ("a/.hidden", b""),
        ("shows/Foo.S01E02.mkv", b"episode"),
        ("music/song.flac", b"flac"),
        ("pics/cover.jpg", b"jpeg"),
        ("notes.xyz", b"12345"),
    ];
    for (path, contents) in files {
        std::fs::write(root.join(path), contents).unwrap();
    }
}
