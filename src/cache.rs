//! Per-file result cache.
//!
//! Each processor remembers what it learned about a file, keyed by the
//! file's absolute path. A key is computed at most once even when several
//! listings race for the same file; later callers wait on the first.

use dashmap::DashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Thread-safe, insert-only map from absolute path to a processing result.
pub struct ResultCache<V> {
    entries: DashMap<PathBuf, Arc<OnceCell<V>>>,
}

impl<V> Default for ResultCache<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V: Clone> ResultCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `path`, if one has been stored.
    pub fn get(&self, path: &Path) -> Option<V> {
        let cell = self.entries.get(path).map(|e| Arc::clone(e.value()))?;
        cell.get().cloned()
    }

    /// Whether a completed result exists for `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries
            .get(path)
            .map(|e| e.value().initialized())
            .unwrap_or(false)
    }

    /// Store a value unless one is already present. Returns the value that
    /// ends up cached.
    pub fn put(&self, path: &Path, value: V) -> V {
        let cell = self.cell(path);
        match cell.set(value.clone()) {
            Ok(()) => value,
            Err(_) => cell.get().cloned().unwrap_or(value),
        }
    }

    /// Return the cached value or run `init` to produce it.
    ///
    /// Concurrent callers for the same path share a single `init` run. A
    /// failed `init` leaves nothing behind, so the next caller retries.
    pub async fn get_or_try_init<E, F, Fut>(&self, path: &Path, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(path);
        cell.get_or_try_init(init).await.cloned()
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The shard guard must be released before awaiting on the cell.
    fn cell(&self, path: &Path) -> Arc<OnceCell<V>> {
        if let Some(existing) = self.entries.get(path) {
            return Arc::clone(existing.value());
        }
        Arc::clone(
            self.entries
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        )
    }
}
