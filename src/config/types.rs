use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub icons: IconConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// A browsable root directory. Its position in `libraries` is its identifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    pub name: String,

    /// Informational only (e.g. "movies", "apps").
    #[serde(rename = "type", default)]
    pub kind: String,

    pub path: PathBuf,
}

/// How listings are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogMode {
    /// Read and enrich one directory level per request.
    #[default]
    OnDemand,
    /// Walk every library once at startup and serve from memory.
    Background,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub mode: CatalogMode,

    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Maximum number of entries enriched at the same time.
    #[serde(default = "default_scan_concurrency")]
    pub scan_concurrency: usize,

    /// Upper bound on one external metadata lookup.
    #[serde(default = "default_enrichment_timeout")]
    pub enrichment_timeout_secs: u64,

    /// Upper bound on one package icon extraction.
    #[serde(default = "default_extraction_timeout")]
    pub extraction_timeout_secs: u64,

    /// Where extracted package icons are written.
    #[serde(default = "default_icon_cache_dir")]
    pub icon_cache_dir: PathBuf,
}

fn default_page_size() -> usize {
    100
}
fn default_scan_concurrency() -> usize {
    8
}
fn default_enrichment_timeout() -> u64 {
    20
}
fn default_extraction_timeout() -> u64 {
    10
}
fn default_icon_cache_dir() -> PathBuf {
    std::env::temp_dir().join("mediashelf-icons")
}

impl CatalogConfig {
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            mode: CatalogMode::default(),
            default_page_size: default_page_size(),
            scan_concurrency: default_scan_concurrency(),
            enrichment_timeout_secs: default_enrichment_timeout(),
            extraction_timeout_secs: default_extraction_timeout(),
            icon_cache_dir: default_icon_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// Leave empty to disable movie/TV lookups.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// TMDB image size segment, e.g. "w500" or "original".
    #[serde(default = "default_image_size")]
    pub image_size: String,
}

fn default_language() -> String {
    "en-US".to_string()
}
fn default_image_size() -> String {
    "original".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            image_size: default_image_size(),
        }
    }
}

/// Icon URLs applied when nothing more specific is known.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IconConfig {
    #[serde(default = "default_folder_icon")]
    pub folder: String,

    #[serde(default = "default_file_icon")]
    pub file: String,

    #[serde(default = "default_mp3_icon")]
    pub mp3: String,

    #[serde(default = "default_flac_icon")]
    pub flac: String,

    /// Used for every other music extension.
    #[serde(default = "default_mp3_icon")]
    pub music: String,

    /// Public prefix under which extracted package icons are served.
    #[serde(default = "default_icon_route")]
    pub cache_route: String,
}

fn default_folder_icon() -> String {
    "https://cdn-icons-png.freepik.com/256/12532/12532956.png".to_string()
}
fn default_file_icon() -> String {
    "https://cdn-icons-png.flaticon.com/256/607/607674.png".to_string()
}
fn default_mp3_icon() -> String {
    "https://cdn-icons-png.flaticon.com/512/4039/4039628.png".to_string()
}
fn default_flac_icon() -> String {
    "https://cdn-icons-png.flaticon.com/128/14391/14391198.png".to_string()
}
fn default_icon_route() -> String {
    "/icons".to_string()
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            folder: default_folder_icon(),
            file: default_file_icon(),
            mp3: default_mp3_icon(),
            flac: default_flac_icon(),
            music: default_mp3_icon(),
            cache_route: default_icon_route(),
        }
    }
}
