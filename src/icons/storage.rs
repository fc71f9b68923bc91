use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};

/// Filesystem store for extracted icons.
///
/// Icons live at `{base_dir}/{key}.png` where `key` is derived from the
/// absolute path of the package the icon came from, so re-extracting the
/// same package overwrites the same file.
#[derive(Debug, Clone)]
pub struct IconStorage {
    base_dir: PathBuf,
    route: String,
}

impl IconStorage {
    /// Create a store rooted at `base_dir`, publicly reachable under `route`.
    pub fn new(base_dir: PathBuf, route: impl Into<String>) -> Self {
        let route = route.into().trim_end_matches('/').to_string();
        Self { base_dir, route }
    }

    /// Filesystem location of the icon for `source`.
    pub fn path_for(&self, source: &Path) -> PathBuf {
        self.base_dir.join(file_name(&icon_key(source)))
    }

    /// Public URL of a stored icon.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.route, file_name(key))
    }

    /// Encode `icon` as PNG and write it for `source`. Returns the key.
    pub fn store(&self, source: &Path, icon: &DynamicImage) -> Result<String> {
        std::fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("Failed to create icon directory: {}", self.base_dir.display())
        })?;

        let key = icon_key(source);
        let target = self.base_dir.join(file_name(&key));

        let mut buf = Cursor::new(Vec::new());
        icon.write_to(&mut buf, ImageFormat::Png)
            .context("Failed to encode icon as PNG")?;
        std::fs::write(&target, buf.into_inner())
            .with_context(|| format!("Failed to write icon file: {}", target.display()))?;

        Ok(key)
    }
}

/// Stable cache key for a source file: hex SHA-256 of its path.
pub fn icon_key(source: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.to_string_lossy().as_bytes());
    hex::encode(hasher.finalize())
}

fn file_name(key: &str) -> String {
    format!("{key}.png")
}
