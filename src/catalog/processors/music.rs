//! Audio files: static icons by extension, no lookups.

use std::path::Path;

use async_trait::async_trait;
use mediashelf_common::paths::classify_path;
use mediashelf_common::{MediaKind, MediaType, Result};

use crate::catalog::entry::CatalogEntry;
use crate::catalog::processor::Processor;
use crate::config::IconConfig;

pub struct MusicProcessor {
    icons: IconConfig,
}

impl MusicProcessor {
    pub fn new(icons: IconConfig) -> Self {
        Self { icons }
    }
}

#[async_trait]
impl Processor for MusicProcessor {
    fn name(&self) -> &'static str {
        "music"
    }

    fn matches(&self, file_name: &str) -> bool {
        classify_path(Path::new(file_name)) == MediaKind::Music
    }

    async fn process(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn describe(&self, entry: &mut CatalogEntry) {
        entry.media_type = MediaType::Music;
        entry.icon = match entry.extension.as_str() {
            ".mp3" => self.icons.mp3.clone(),
            ".flac" => self.icons.flac.clone(),
            _ => self.icons.music.clone(),
        };
    }
}
