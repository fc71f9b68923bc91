//! Catalog data model.

use std::collections::BTreeMap;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use mediashelf_common::paths::dotted_extension;
use mediashelf_common::{Error, MediaType, Result};
use serde::{Deserialize, Serialize};

use crate::config::{IconConfig, LibraryConfig};

/// A configured root directory. `id` is its index in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: PathBuf,
}

impl Library {
    pub fn from_config(id: usize, config: &LibraryConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            kind: config.kind.clone(),
            path: config.path.clone(),
        }
    }

    /// Absolute location of a normalized relative path.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            self.path.clone()
        } else {
            self.path.join(relative)
        }
    }
}

/// One file or directory as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub library_id: usize,
    /// Display name; enrichment may replace it with a title.
    pub name: String,
    /// `/`-separated path from the library root. Identity key.
    pub relative_path: String,
    #[serde(skip)]
    pub absolute_path: PathBuf,
    pub is_directory: bool,
    pub size_bytes: u64,
    pub permissions: u32,
    /// Seconds since the Unix epoch.
    pub modified: i64,
    pub media_type: MediaType,
    /// Lowercased, including the dot. Empty for directories.
    pub extension: String,
    pub icon: String,
    pub line1: String,
    pub line2: String,
    pub line3: String,
    /// Enrichment-only attributes (season, provider id, overview, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl CatalogEntry {
    /// Build an unenriched entry from filesystem metadata.
    ///
    /// Directories get the folder icon; everything else starts out as a
    /// generic file showing its size.
    pub fn from_metadata(
        library_id: usize,
        file_name: &str,
        relative_path: String,
        absolute_path: PathBuf,
        metadata: &Metadata,
        icons: &IconConfig,
    ) -> Self {
        let is_directory = metadata.is_dir();
        let size_bytes = if is_directory { 0 } else { metadata.len() };

        let (media_type, extension, icon, line1) = if is_directory {
            (MediaType::Directory, String::new(), icons.folder.clone(), String::new())
        } else {
            (
                MediaType::File,
                dotted_extension(file_name),
                icons.file.clone(),
                format!("{size_bytes} bytes"),
            )
        };

        Self {
            library_id,
            name: file_name.to_string(),
            relative_path,
            absolute_path,
            is_directory,
            size_bytes,
            permissions: permission_bits(metadata),
            modified: modified_unix(metadata),
            media_type,
            extension,
            icon,
            line1,
            line2: String::new(),
            line3: String::new(),
            extras: BTreeMap::new(),
        }
    }

    /// Name as found on disk, regardless of any display rewrite.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Whether the on-disk name follows the leading-dot convention.
    pub fn is_hidden(&self) -> bool {
        mediashelf_common::paths::is_hidden(self.file_name())
    }

    /// Relative path of the directory holding this entry.
    pub fn parent(&self) -> &str {
        self.relative_path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

fn modified_unix(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Normalize a client-supplied relative path.
///
/// Surrounding whitespace and slashes are dropped and an empty result means
/// the library root. Paths that climb out of the root are rejected.
pub fn normalize_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let mut parts = Vec::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::path_not_accessible(
                    trimmed,
                    std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "path escapes the library root",
                    ),
                ));
            }
        }
    }
    Ok(parts.join("/"))
}

/// Join a directory's relative path with a child name.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
