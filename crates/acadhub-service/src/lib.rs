//! # acadhub-service
//!
//! Business logic service layer for AcadHub. The file services orchestrate
//! the remote blob store and the local metadata repositories so that the
//! two resources behind every file record are created together and
//! destroyed together, or degrade along the documented failure paths.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references, so tests substitute
//! in-memory fakes.

pub mod account;
pub mod audit;
pub mod context;
pub mod file;

#[cfg(test)]
pub(crate) mod testing;

pub use account::AccountService;
pub use audit::AuditWriter;
pub use context::RequestContext;
pub use file::{
    DeletionOutcome, DeletionService, FileQueryService, UploadOutcome, UploadRequest,
    UploadService,
};
