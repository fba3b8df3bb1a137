//! Read-through queries over file records and tags.
//!
//! No invariants here beyond returning what the database returns; the
//! lifecycle guarantees live in the upload and deletion services.

use std::sync::Arc;

use acadhub_core::result::AppResult;
use acadhub_database::repositories::{FileRecordStore, TagStore};
use acadhub_entity::file::FileRecordWithOwner;

use crate::context::RequestContext;

/// Listing queries consumed by the UI collaborators.
#[derive(Clone)]
pub struct FileQueryService {
    files: Arc<dyn FileRecordStore>,
    tags: Arc<dyn TagStore>,
}

impl std::fmt::Debug for FileQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileQueryService").finish()
    }
}

impl FileQueryService {
    /// Creates a new query service.
    pub fn new(files: Arc<dyn FileRecordStore>, tags: Arc<dyn TagStore>) -> Self {
        Self { files, tags }
    }

    /// All records, owner fields populated.
    pub async fn list_all(&self) -> AppResult<Vec<FileRecordWithOwner>> {
        self.files.list_all().await
    }

    /// The caller's own records.
    pub async fn list_owned(&self, ctx: &RequestContext) -> AppResult<Vec<FileRecordWithOwner>> {
        self.files.list_by_owner(ctx.user_id).await
    }

    /// All known tag names.
    pub async fn tag_names(&self) -> AppResult<Vec<String>> {
        self.tags.list_names().await
    }
}
