//! Storage layer for vault data
//!
//! Manages the data directory layout, the content store, and persisted models.

pub mod content_store;
pub mod file_system;
pub mod models;

pub use content_store::{ContentStore, ContentStoreError, FsContentStore};
