//! # acadhub-storage
//!
//! Blob store adapter for AcadHub: an HTTP client for the drive-style
//! remote object store, implementing the [`acadhub_core::traits::BlobStore`]
//! trait.

pub mod drive;

pub use drive::DriveClient;
