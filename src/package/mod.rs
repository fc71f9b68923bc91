//! Application package inspection.
//!
//! The [`IconExtractor`] trait is the seam between the catalog and binary
//! package formats. [`ApkExtractor`] handles Android packages.

mod apk;
pub mod axml;

use std::path::Path;

use image::DynamicImage;
use mediashelf_common::Result;

pub use apk::{ApkExtractor, ApkPackage};

/// An opened package file.
pub trait PackageHandle {
    /// Decode the embedded launcher icon.
    fn icon(&mut self) -> Result<DynamicImage>;

    /// Human-readable application name.
    fn label(&self) -> String;

    /// Unique package identifier (e.g. `com.example.app`).
    fn package_identifier(&self) -> String;
}

/// Opens package files of one format.
///
/// Implementations are blocking; callers run them off the async runtime.
pub trait IconExtractor: Send + Sync {
    /// A short name for logging (e.g. "apk").
    fn name(&self) -> &'static str;

    /// Open `path`, failing with [`mediashelf_common::Error::Format`] when
    /// it is not a readable package.
    fn open(&self, path: &Path) -> Result<Box<dyn PackageHandle>>;
}

#[cfg(test)]
pub(crate) use apk::testing as apk_testing;
