//! # acadhub-core
//!
//! Core crate for AcadHub. Contains the unified error system, configuration
//! schemas, and the blob store trait that the orchestration layer and tests
//! depend on.
//!
//! This crate has **no** internal dependencies on other AcadHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
