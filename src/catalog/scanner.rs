//! Directory reading and per-request enrichment.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use mediashelf_common::{Error, Result};
use tracing::{debug, warn};

use super::entry::{join_relative, CatalogEntry, Library};
use super::processor::ProcessorRegistry;
use crate::config::IconConfig;

/// Reads one directory level and enriches what it finds.
pub struct DirectoryScanner {
    registry: Arc<ProcessorRegistry>,
    icons: IconConfig,
    concurrency: usize,
}

impl DirectoryScanner {
    pub fn new(registry: Arc<ProcessorRegistry>, icons: IconConfig, concurrency: usize) -> Self {
        Self {
            registry,
            icons,
            concurrency: concurrency.max(1),
        }
    }

    pub fn registry(&self) -> &Arc<ProcessorRegistry> {
        &self.registry
    }

    pub fn icons(&self) -> &IconConfig {
        &self.icons
    }

    /// List and enrich the entries of `relative` in directory order.
    ///
    /// Hidden entries are dropped before any processing unless
    /// `include_hidden` is set.
    pub async fn list(
        &self,
        library: &Library,
        relative: &str,
        include_hidden: bool,
    ) -> Result<Vec<CatalogEntry>> {
        let entries = read_level(library, relative, &self.icons).await?;
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|e| include_hidden || !e.is_hidden())
            .collect();

        debug!(
            library = library.id,
            path = %relative,
            count = entries.len(),
            "enriching directory listing"
        );

        let registry = &self.registry;
        let enriched: Vec<CatalogEntry> = stream::iter(entries)
            .map(|mut entry| async move {
                registry.enrich(&mut entry).await;
                entry
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        Ok(enriched)
    }

    /// Stat and enrich a single path.
    pub async fn entry(&self, library: &Library, relative: &str) -> Result<CatalogEntry> {
        let mut entry = stat_entry(library, relative, &self.icons).await?;
        self.registry.enrich(&mut entry).await;
        Ok(entry)
    }
}

/// Unenriched entry for one path, following symlinks.
pub async fn stat_entry(
    library: &Library,
    relative: &str,
    icons: &IconConfig,
) -> Result<CatalogEntry> {
    let absolute = library.resolve(relative);
    let metadata = tokio::fs::metadata(&absolute)
        .await
        .map_err(|e| Error::path_not_accessible(&absolute, e))?;

    let name = if relative.is_empty() {
        library.name.clone()
    } else {
        file_name(&absolute)
    };

    Ok(CatalogEntry::from_metadata(
        library.id,
        &name,
        relative.to_string(),
        absolute,
        &metadata,
        icons,
    ))
}

/// Unenriched entries of one directory, in the order the OS returns them.
///
/// Entries whose metadata cannot be read are skipped.
pub async fn read_level(
    library: &Library,
    relative: &str,
    icons: &IconConfig,
) -> Result<Vec<CatalogEntry>> {
    let dir = library.resolve(relative);
    let mut reader = tokio::fs::read_dir(&dir)
        .await
        .map_err(|e| Error::path_not_accessible(&dir, e))?;

    let mut entries = Vec::new();
    loop {
        let item = match reader.next_entry().await {
            Ok(Some(item)) => item,
            Ok(None) => break,
            Err(e) => return Err(Error::path_not_accessible(&dir, e)),
        };

        let path = item.path();
        let metadata = match item.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read entry metadata, skipping");
                continue;
            }
        };

        let name = item.file_name().to_string_lossy().into_owned();
        entries.push(CatalogEntry::from_metadata(
            library.id,
            &name,
            join_relative(relative, &name),
            path,
            &metadata,
            icons,
        ));
    }

    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::processors::FallbackProcessor;
    use assert_matches::assert_matches;
    use mediashelf_common::MediaType;
    use std::path::PathBuf;

    fn library(root: &Path) -> Library {
        Library {
            id: 0,
            name: "Test".into(),
            kind: String::new(),
            path: root.to_path_buf(),
        }
    }

    fn scanner() -> DirectoryScanner {
        let icons = IconConfig::default();
        let registry =
            ProcessorRegistry::new(vec![], Arc::new(FallbackProcessor::new(icons.clone())));
        DirectoryScanner::new(Arc::new(registry), icons, 4)
    }

    #[tokio::test]
    async fn test_hidden_entries_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), b"SECRET=1").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"hi").unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let lib = library(dir.path());

        let visible = scanner().list(&lib, "", false).await.unwrap();
        let names: Vec<_> = visible.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["readme.txt"]);

        let all = scanner().list(&lib, "", true).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|e| e.name == ".env"));
        assert!(all.iter().any(|e| e.name == ".git" && e.is_directory));
    }

    #[tokio::test]
    async fn test_listing_matches_directory_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let lib = library(dir.path());

        let expected: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let listed: Vec<String> = scanner()
            .list(&lib, "", false)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.relative_path)
            .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library(dir.path());
        assert_matches!(
            scanner().list(&lib, "nope", false).await,
            Err(Error::PathNotAccessible { .. })
        );
    }

    #[tokio::test]
    async fn test_entry_for_root_and_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a/file.xyz"), b"12345").unwrap();
        let lib = library(dir.path());

        let root = scanner().entry(&lib, "").await.unwrap();
        assert_eq!(root.name, "Test");
        assert_eq!(root.media_type, MediaType::Directory);

        let file = scanner().entry(&lib, "a/file.xyz").await.unwrap();
        assert_eq!(file.relative_path, "a/file.xyz");
        assert_eq!(file.absolute_path, PathBuf::from(dir.path()).join("a/file.xyz"));
        assert_eq!(file.media_type, MediaType::File);
        assert_eq!(file.line1, "5 bytes");
    }
}
