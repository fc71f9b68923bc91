//! Android application packages.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use mediashelf_common::{Error, Result};
use tracing::debug;
use zip::ZipArchive;

use super::axml::{self, Manifest};
use super::{IconExtractor, PackageHandle};

const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// Upper bound on the buffer reserved from a zip header's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// [`IconExtractor`] for `.apk` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApkExtractor;

impl IconExtractor for ApkExtractor {
    fn name(&self) -> &'static str {
        "apk"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PackageHandle>> {
        Ok(Box::new(ApkPackage::open(path)?))
    }
}

/// An opened APK: the zip archive plus its decoded manifest.
pub struct ApkPackage {
    path: PathBuf,
    archive: ZipArchive<File>,
    manifest: Manifest,
}

impl ApkPackage {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::format(path, e.to_string()))?;
        let mut archive = ZipArchive::new(file).map_err(|e| Error::format(path, e.to_string()))?;

        let raw = read_entry(&mut archive, MANIFEST_ENTRY)
            .map_err(|e| Error::format(path, format!("{MANIFEST_ENTRY}: {e}")))?;
        let manifest = axml::parse_manifest(&raw)
            .map_err(|e| Error::format(path, format!("{MANIFEST_ENTRY}: {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            manifest,
        })
    }

    /// Archive entry holding the best launcher icon, if any.
    fn icon_entry(&self) -> Option<String> {
        self.archive
            .file_names()
            .filter_map(|name| icon_rank(name).map(|rank| (rank, name)))
            .max_by_key(|(rank, _)| *rank)
            .map(|(_, name)| name.to_string())
    }
}

impl PackageHandle for ApkPackage {
    fn icon(&mut self) -> Result<DynamicImage> {
        let entry = self
            .icon_entry()
            .ok_or_else(|| Error::IconNotFound(self.path.clone()))?;
        let bytes = read_entry(&mut self.archive, &entry)
            .map_err(|e| Error::format(&self.path, format!("{entry}: {e}")))?;
        image::load_from_memory(&bytes)
            .map_err(|e| Error::format(&self.path, format!("{entry}: {e}")))
    }

    /// Literal labels only. Labels stored as resource references fall back
    /// to the package identifier.
    fn label(&self) -> String {
        if let Some(label) = &self.manifest.label {
            return label.clone();
        }
        if let Some(id) = self.manifest.label_ref {
            debug!(
                path = %self.path.display(),
                resource = %format!("{id:#010x}"),
                "label is a resource reference"
            );
        }
        self.package_identifier()
    }

    fn package_identifier(&self) -> String {
        self.manifest.package.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> std::io::Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;
    let mut buf = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Rank a launcher icon candidate: exact `ic_launcher.png` beats variants,
/// then higher density wins.
fn icon_rank(name: &str) -> Option<(bool, u32)> {
    let mut parts = name.split('/');
    if parts.next() != Some("res") {
        return None;
    }
    let dir = parts.next()?;
    let file = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if !(dir.starts_with("mipmap") || dir.starts_with("drawable")) {
        return None;
    }
    let stem = file.strip_suffix(".png")?;
    if !stem.starts_with("ic_launcher")
        || stem.ends_with("_foreground")
        || stem.ends_with("_background")
    {
        return None;
    }
    Some((stem == "ic_launcher", density(dir)))
}

fn density(dir: &str) -> u32 {
    for qualifier in dir.split('-').skip(1) {
        match qualifier {
            "ldpi" => return 120,
            "mdpi" => return 160,
            "tvdpi" => return 213,
            "hdpi" => return 240,
            "xhdpi" => return 320,
            "xxhdpi" => return 480,
            "xxxhdpi" => return 640,
            _ => {}
        }
    }
    160
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{Cursor, Write};
    use std::path::Path;

    use image::{ImageFormat, RgbaImage};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::package::axml;

    pub fn png(size: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(size, size, image::Rgba([20, 200, 80, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// Write an APK with a literal label and launcher icons of the given
    /// `(directory, pixel size)`.
    pub fn write_apk(path: &Path, package: &str, label: &str, icons: &[(&str, u32)]) {
        write_apk_with_manifest(path, &axml::testing::manifest(package, label), icons);
    }

    pub fn write_apk_with_manifest(path: &Path, manifest: &[u8], icons: &[(&str, u32)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        zip.start_file("AndroidManifest.xml", options).unwrap();
        zip.write_all(manifest).unwrap();

        for (dir, size) in icons {
            zip.start_file(format!("res/{dir}/ic_launcher.png"), options)
                .unwrap();
            zip.write_all(&png(*size)).unwrap();
        }
        zip.finish().unwrap();
    }
}
