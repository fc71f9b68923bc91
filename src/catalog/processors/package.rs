//! Application packages: launcher icon, label and identifier.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mediashelf_common::paths::classify_path;
use mediashelf_common::{Error, MediaKind, Result};
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::catalog::entry::CatalogEntry;
use crate::catalog::processor::Processor;
use crate::icons::IconStorage;
use crate::package::IconExtractor;

/// Outcome of one successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub icon_key: String,
    pub icon_path: PathBuf,
    pub label: String,
    pub package_id: String,
}

/// Claims package files. Extraction runs on the blocking pool with a time
/// limit. A failed extraction is logged and remembered, so each path is
/// opened at most once.
pub struct PackageProcessor {
    extractor: Arc<dyn IconExtractor>,
    storage: IconStorage,
    cache: ResultCache<Option<PackageInfo>>,
    timeout: Duration,
}

impl PackageProcessor {
    pub fn new(extractor: Arc<dyn IconExtractor>, storage: IconStorage, timeout: Duration) -> Self {
        Self {
            extractor,
            storage,
            cache: ResultCache::new(),
            timeout,
        }
    }

    /// Extraction result for `path`, if it was processed and succeeded.
    pub fn cached(&self, path: &Path) -> Option<PackageInfo> {
        self.cache.get(path).flatten()
    }

    async fn extract(&self, path: &Path) -> Result<PackageInfo> {
        let extractor = Arc::clone(&self.extractor);
        let storage = self.storage.clone();
        let source = path.to_path_buf();

        let task =
            tokio::task::spawn_blocking(move || extract_blocking(&*extractor, &storage, &source));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(Error::format(path, format!("extraction task failed: {join}"))),
            Err(_) => Err(Error::Timeout {
                path: path.to_path_buf(),
                after: self.timeout,
            }),
        }
    }
}

fn extract_blocking(
    extractor: &dyn IconExtractor,
    storage: &IconStorage,
    source: &Path,
) -> Result<PackageInfo> {
    let mut package = extractor.open(source)?;
    let icon = package.icon()?;
    let icon_key = storage
        .store(source, &icon)
        .map_err(|e| Error::format(source, format!("{e:#}")))?;

    debug!(
        extractor = extractor.name(),
        path = %source.display(),
        key = %icon_key,
        "extracted package icon"
    );

    Ok(PackageInfo {
        icon_path: storage.path_for(source),
        icon_key,
        label: package.label(),
        package_id: package.package_identifier(),
    })
}

#[async_trait]
impl Processor for PackageProcessor {
    fn name(&self) -> &'static str {
        "package"
    }

    fn matches(&self, file_name: &str) -> bool {
        classify_path(Path::new(file_name)) == MediaKind::Package
    }

    async fn process(&self, path: &Path) -> Result<()> {
        self.cache
            .get_or_try_init(path, || async {
                match self.extract(path).await {
                    Ok(info) => Ok::<_, Error>(Some(info)),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "package extraction failed");
                        Ok(None)
                    }
                }
            })
            .await?;
        Ok(())
    }

    fn describe(&self, entry: &mut CatalogEntry) {
        if let Some(info) = self.cached(&entry.absolute_path) {
            entry.icon = self.storage.url_for(&info.icon_key);
            entry.line1 = info.label;
            entry.line2 = info.package_id;
        }
    }
}
