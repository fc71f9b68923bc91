//! Content-addressed storage for icons extracted from package files.
//!
//! Extracted icons are written once under the configured cache directory and
//! served back to clients through the icon route.

mod storage;

pub use storage::{icon_key, IconStorage};
