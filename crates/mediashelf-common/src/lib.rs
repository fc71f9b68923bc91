//! Mediashelf-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across mediashelf:
//!
//! - **Core Types**: the [`MediaType`] reported for every catalog entry and
//!   the [`MediaKind`] hint produced by extension classification
//! - **Path Utilities**: extension tables and [`paths::classify`]
//! - **Error Handling**: the catalog error taxonomy and result alias
//!
//! # Examples
//!
//! ```
//! use mediashelf_common::{paths::classify, Error, MediaKind};
//!
//! assert_eq!(classify("mkv"), MediaKind::Video);
//! assert_eq!(classify("xyz"), MediaKind::File);
//!
//! fn lookup(index: usize) -> mediashelf_common::Result<()> {
//!     Err(Error::LibraryNotFound(index))
//! }
//! assert!(lookup(3).is_err());
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
