//! File lifecycle services: upload, deletion, and read-through queries.

pub mod delete;
pub mod query;
pub mod upload;

pub use delete::{DeletionOutcome, DeletionService};
pub use query::FileQueryService;
pub use upload::{UploadOutcome, UploadRequest, UploadService};
