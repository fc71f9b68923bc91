//! The [`Processor`] trait and the ordered registry that dispatches to it.
//!
//! Enrichment is split in two: [`Processor::process`] does the slow,
//! side-effecting work once per file and keeps the outcome in the
//! processor's own cache, [`Processor::describe`] cheaply copies that
//! outcome onto an entry and may run on every listing.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mediashelf_common::Result;
use tracing::{debug, warn};

use super::entry::CatalogEntry;

/// Enrichment for one kind of file.
#[async_trait]
pub trait Processor: Send + Sync {
    /// A short name for logging (e.g. "video").
    fn name(&self) -> &'static str;

    /// Whether this processor claims `file_name`.
    fn matches(&self, file_name: &str) -> bool;

    /// Compute and cache whatever `describe` needs for the file at `path`.
    ///
    /// Calling this again for a path that already succeeded does no work.
    async fn process(&self, path: &Path) -> Result<()>;

    /// Fill display fields of `entry` from cached results, or apply this
    /// processor's defaults when nothing is cached.
    fn describe(&self, entry: &mut CatalogEntry);
}

/// Ordered processor list. The first processor that matches wins; the
/// fallback claims everything else.
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn Processor>>,
    fallback: Arc<dyn Processor>,
}

impl ProcessorRegistry {
    /// Processors are tried in the order provided, then `fallback`.
    pub fn new(processors: Vec<Arc<dyn Processor>>, fallback: Arc<dyn Processor>) -> Self {
        Self {
            processors,
            fallback,
        }
    }

    /// The processor responsible for `file_name`. Never fails.
    pub fn select(&self, file_name: &str) -> &dyn Processor {
        self.processors
            .iter()
            .find(|p| p.matches(file_name))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Run `process` for a non-directory entry. Failures are logged and
    /// swallowed; the entry keeps its defaults.
    pub async fn process(&self, entry: &CatalogEntry) {
        if entry.is_directory {
            return;
        }
        let processor = self.select(entry.file_name());
        if let Err(e) = processor.process(&entry.absolute_path).await {
            warn!(
                processor = processor.name(),
                path = %entry.absolute_path.display(),
                error = %e,
                "enrichment failed, keeping defaults"
            );
        }
    }

    /// Apply the responsible processor's description. Directories are left
    /// untouched.
    pub fn describe(&self, entry: &mut CatalogEntry) {
        if entry.is_directory {
            return;
        }
        let processor = self.select(entry.file_name());
        processor.describe(entry);
    }

    /// `process` followed by `describe`.
    pub async fn enrich(&self, entry: &mut CatalogEntry) {
        self.process(entry).await;
        self.describe(entry);
        debug!(path = %entry.relative_path, media_type = %entry.media_type, "entry enriched");
    }
}
