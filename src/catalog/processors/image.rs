//! Still images are their own icon, served through the raw file route.

use std::path::Path;

use async_trait::async_trait;
use mediashelf_common::paths::classify_path;
use mediashelf_common::{MediaKind, MediaType, Result};

use crate::catalog::entry::CatalogEntry;
use crate::catalog::processor::Processor;

#[derive(Debug, Default)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// URL under which the bytes of a library file are served.
pub fn raw_url(library_id: usize, relative_path: &str) -> String {
    let encoded: Vec<String> = relative_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("/api/libraries/{library_id}/raw/{}", encoded.join("/"))
}

#[async_trait]
impl Processor for ImageProcessor {
    fn name(&self) -> &'static str {
        "image"
    }

    fn matches(&self, file_name: &str) -> bool {
        classify_path(Path::new(file_name)) == MediaKind::Image
    }

    async fn process(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn describe(&self, entry: &mut CatalogEntry) {
        entry.media_type = MediaType::Image;
        entry.icon = raw_url(entry.library_id, &entry.relative_path);
    }
}
