//! The catalog pipeline: directory traversal, classification, enrichment
//! and the two serving modes.
//!
//! - [`entry`] -- `CatalogEntry`, `Library` and path normalization.
//! - [`processor`] -- the `Processor` trait and ordered registry.
//! - [`processors`] -- video, music, image, package and fallback handlers.
//! - [`scanner`] -- one-level reads for on-demand listings.
//! - [`index`] -- the background walk and its in-memory index.
//! - [`service`] -- `CatalogService`, the facade used by HTTP and the CLI.

pub mod entry;
pub mod index;
pub mod processor;
pub mod processors;
pub mod scanner;
pub mod service;

pub use entry::{normalize_path, CatalogEntry, Library};
pub use index::{paginate, LibraryIndex};
pub use processor::{Processor, ProcessorRegistry};
pub use scanner::DirectoryScanner;
pub use service::{standard_registry, CatalogService};
