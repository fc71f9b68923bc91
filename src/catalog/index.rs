//! In-memory catalog built by a background walk.
//!
//! The walk appends raw entries in traversal order and enriches them
//! concurrently. Listings read whatever has been appended so far; a
//! request arriving before the walk finishes sees a partial catalog.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::entry::{CatalogEntry, Library};
use super::processor::ProcessorRegistry;
use crate::config::IconConfig;

/// Entries of one library, in walk order.
#[derive(Default)]
pub struct LibraryIndex {
    entries: RwLock<Vec<CatalogEntry>>,
    complete: AtomicBool,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: CatalogEntry) {
        self.entries.write().push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the walk has finished and every entry has been processed.
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    fn mark_complete(&self) {
        self.complete.store(true, Ordering::Release);
    }

    /// Direct children of `parent` (a normalized relative path), in walk
    /// order.
    pub fn children(&self, parent: &str, include_hidden: bool) -> Vec<CatalogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.parent() == parent)
            .filter(|e| include_hidden || !e.is_hidden())
            .cloned()
            .collect()
    }
}

/// Clamp paging input and slice. `page` is 1-based; values below 1 fall
/// back to page 1 and `default_size` respectively. An offset past the end
/// yields an empty page.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64, default_size: usize) -> Vec<T> {
    let page = page.max(1) as usize;
    let size = if page_size < 1 {
        default_size.max(1)
    } else {
        page_size as usize
    };
    let offset = (page - 1).saturating_mul(size);
    items.into_iter().skip(offset).take(size).collect()
}

/// `/`-joined path of `path` below `root`, or `None` when it is not inside.
fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Walk `library` once, appending every entry to `index` and processing
/// non-directories with at most `concurrency` in flight.
///
/// Per-entry failures are logged by the registry and never stop the walk.
pub async fn build_index(
    library: Library,
    index: Arc<LibraryIndex>,
    registry: Arc<ProcessorRegistry>,
    icons: IconConfig,
    concurrency: usize,
) {
    info!(library = library.id, root = %library.path.display(), "Starting background scan");

    let (tx, mut rx) = mpsc::channel::<CatalogEntry>(256);
    let root = library.path.clone();
    let library_id = library.id;

    let walker = tokio::task::spawn_blocking(move || {
        for item in WalkDir::new(&root).min_depth(1).into_iter() {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    warn!(error = %err, "Error walking directory");
                    continue;
                }
            };

            let Some(relative) = relative_to(&root, item.path()) else {
                continue;
            };
            let metadata = match item.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(path = %item.path().display(), error = %err, "Failed to read entry metadata, skipping");
                    continue;
                }
            };

            let name = item.file_name().to_string_lossy().into_owned();
            let entry = CatalogEntry::from_metadata(
                library_id,
                &name,
                relative,
                item.path().to_path_buf(),
                &metadata,
                &icons,
            );
            if tx.blocking_send(entry).is_err() {
                break;
            }
        }
    });

    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut found = 0usize;

    while let Some(entry) = rx.recv().await {
        found += 1;
        index.push(entry.clone());
        if entry.is_directory {
            continue;
        }

        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let registry = Arc::clone(&registry);
        tasks.spawn(async move {
            registry.process(&entry).await;
            drop(permit);
        });
    }

    if let Err(e) = walker.await {
        warn!(library = library.id, error = %e, "Background walk task failed");
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(library = library.id, error = %e, "Enrichment task failed");
        }
    }

    index.mark_complete();
    info!(library = library.id, entries = found, "Background scan complete");
    debug!(library = library.id, indexed = index.len(), "index size");
}
