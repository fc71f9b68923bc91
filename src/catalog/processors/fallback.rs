//! Catch-all for files no other processor claims.

use std::path::Path;

use async_trait::async_trait;
use mediashelf_common::{MediaType, Result};

use crate::catalog::entry::CatalogEntry;
use crate::catalog::processor::Processor;
use crate::config::IconConfig;

pub struct FallbackProcessor {
    icons: IconConfig,
}

impl FallbackProcessor {
    pub fn new(icons: IconConfig) -> Self {
        Self { icons }
    }
}

#[async_trait]
impl Processor for FallbackProcessor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn matches(&self, _file_name: &str) -> bool {
        true
    }

    async fn process(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn describe(&self, entry: &mut CatalogEntry) {
        if entry.is_directory {
            entry.media_type = MediaType::Directory;
            entry.icon = self.icons.folder.clone();
        } else {
            entry.media_type = MediaType::File;
            entry.icon = self.icons.file.clone();
        }
    }
}
