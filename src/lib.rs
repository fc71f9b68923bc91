//! Mediashelf - media library browser with metadata enrichment
//!
//! This library crate exposes the catalog pipeline and HTTP router for
//! integration testing.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod icons;
pub mod metadata;
pub mod package;
pub mod server;
