//! Trait seams implemented by infrastructure crates.

pub mod blobstore;

pub use blobstore::{BlobStore, ObjectLinks, StoredObject};
