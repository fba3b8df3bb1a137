//! Deletion orchestration.
//!
//! Mirrors the upload ordering: the remote object goes first, the local
//! record second. The record is only removed once the remote object is
//! confirmed gone or confirmed already-gone, so a failed remote delete
//! leaves the record in place and the operation retryable.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use acadhub_core::error::{AppError, ErrorKind};
use acadhub_core::result::AppResult;
use acadhub_core::traits::blobstore::BlobStore;
use acadhub_database::repositories::FileRecordStore;
use acadhub_entity::audit::AuditAction;

use crate::audit::AuditWriter;
use crate::context::RequestContext;

/// What a successful deletion returns.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeletionOutcome {
    /// The deleted record's id.
    pub record_id: Uuid,
    /// Whether the remote object was actually removed by this operation.
    /// `false` means it was already absent, or the stored URL carried no
    /// recognizable remote id.
    pub remote_removed: bool,
}

/// Coordinates ownership verification, remote deletion, and local record
/// removal.
#[derive(Clone)]
pub struct DeletionService {
    blob: Arc<dyn BlobStore>,
    files: Arc<dyn FileRecordStore>,
    audit: AuditWriter,
}

impl std::fmt::Debug for DeletionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionService").finish()
    }
}

impl DeletionService {
    /// Creates a new deletion service.
    pub fn new(
        blob: Arc<dyn BlobStore>,
        files: Arc<dyn FileRecordStore>,
        audit: AuditWriter,
    ) -> Self {
        Self { blob, files, audit }
    }

    /// Deletes one file record and its remote object.
    pub async fn delete(&self, ctx: &RequestContext, record_id: Uuid) -> AppResult<DeletionOutcome> {
        let record = self
            .files
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::not_found("File record not found"))?;

        // Ownership is checked before any side effect.
        if record.owner_id != ctx.user_id {
            return Err(AppError::forbidden("Only the owner can delete this file"));
        }

        let remote_removed = match self.blob.extract_remote_id(&record.file_url) {
            None => {
                warn!(
                    record_id = %record_id,
                    file_url = %record.file_url,
                    "Stored URL has no recognizable remote id; skipping remote deletion"
                );
                false
            }
            Some(remote_id) => match self.blob.delete_by_id(&remote_id).await {
                Ok(()) => true,
                Err(e) if e.is_kind(ErrorKind::NotFound) => {
                    // The goal state "object absent" already holds; note
                    // the discrepancy and carry on with local cleanup.
                    warn!(
                        record_id = %record_id,
                        remote_id = %remote_id,
                        "Remote object already absent; deleting local record anyway"
                    );
                    false
                }
                // Any other remote failure aborts with the record intact.
                Err(e) => return Err(e),
            },
        };

        // A concurrent delete may have removed the row after our load;
        // zero rows affected means the other caller won.
        let deleted = self.files.delete_by_id(record_id).await?;
        if !deleted {
            return Err(AppError::not_found("File record was already deleted"));
        }

        let detail = if remote_removed {
            record.filename.clone()
        } else {
            format!("{} (remote object already absent)", record.filename)
        };
        self.audit
            .record(ctx.user_id, AuditAction::Deleted, Some(record_id), &detail)
            .await;

        info!(
            user_id = %ctx.user_id,
            record_id = %record_id,
            filename = %record.filename,
            remote_removed = remote_removed,
            "File deleted"
        );

        Ok(DeletionOutcome {
            record_id,
            remote_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::upload::UploadRequest;
    use crate::testing::{test_context, TestHarness};
    use bytes::Bytes;

    async fn upload_one(h: &TestHarness, ctx: &RequestContext) -> Uuid {
        let request = UploadRequest {
            filename: "dsp-question-bank.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: Bytes::from_static(b"%PDF-1.4 sample"),
            title: "DSP Question Bank".to_string(),
            subject: "Signals".to_string(),
            semester: "Fifth".to_string(),
            subject_code: "ECE503".to_string(),
            tags: vec![],
        };
        h.upload_service().upload(ctx, request).await.unwrap().id
    }

    #[tokio::test]
    async fn test_successful_deletion_removes_both_resources() {
        let h = TestHarness::new();
        let ctx = test_context();
        let record_id = upload_one(&h, &ctx).await;
        let service = h.deletion_service();

        let outcome = service.delete(&ctx, record_id).await.unwrap();

        assert!(outcome.remote_removed);
        assert_eq!(h.blob.object_count(), 0);
        assert!(h.files.all_records().is_empty());

        let audit = h.audit.entries();
        assert_eq!(audit.len(), 2);
        assert_eq!(audit[1].action, AuditAction::Deleted);
        assert_eq!(audit[1].target_id, Some(record_id));
        assert_eq!(audit[1].detail, "dsp-question-bank.pdf");
    }

    #[tokio::test]
    async fn test_non_owner_receives_forbidden_and_nothing_changes() {
        let h = TestHarness::new();
        let owner = test_context();
        let record_id = upload_one(&h, &owner).await;
        let service = h.deletion_service();

        let stranger = test_context();
        let err = service.delete(&stranger, record_id).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(h.files.all_records().len(), 1);
        assert_eq!(h.blob.object_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let h = TestHarness::new();
        let service = h.deletion_service();

        let err = service
            .delete(&test_context(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_remote_already_absent_still_removes_record() {
        let h = TestHarness::new();
        let ctx = test_context();
        let record_id = upload_one(&h, &ctx).await;

        // Remove the remote object out-of-band.
        let remote_id = h.blob.remote_ids().pop().unwrap();
        h.blob.remove_directly(&remote_id);

        let outcome = h.deletion_service().delete(&ctx, record_id).await.unwrap();

        assert!(!outcome.remote_removed);
        assert!(h.files.all_records().is_empty());

        let audit = h.audit.entries();
        assert_eq!(audit[1].action, AuditAction::Deleted);
        assert!(audit[1].detail.contains("already absent"));
    }

    #[tokio::test]
    async fn test_remote_failure_preserves_record_for_retry() {
        let h = TestHarness::new();
        let ctx = test_context();
        let record_id = upload_one(&h, &ctx).await;
        h.blob.fail_delete();

        let err = h
            .deletion_service()
            .delete(&ctx, record_id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::DeleteFailed);
        assert_eq!(h.files.all_records().len(), 1);
        // Only the upload entry exists; the failed delete is not audited.
        assert_eq!(h.audit.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_url_skips_remote_and_deletes_locally() {
        let h = TestHarness::new();
        let ctx = test_context();
        let record_id = upload_one(&h, &ctx).await;
        h.files
            .overwrite_file_url(record_id, "https://example.com/opaque/link");

        let outcome = h.deletion_service().delete(&ctx, record_id).await.unwrap();

        assert!(!outcome.remote_removed);
        assert!(h.files.all_records().is_empty());
        // The remote object is untouched because its id was unrecoverable.
        assert_eq!(h.blob.object_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_deletes_exactly_one_succeeds() {
        let h = TestHarness::new();
        let ctx = test_context();
        let record_id = upload_one(&h, &ctx).await;
        let service = h.deletion_service();

        let (a, b) = tokio::join!(
            service.delete(&ctx, record_id),
            service.delete(&ctx, record_id)
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert_eq!(failure.kind, ErrorKind::NotFound);

        assert!(h.files.all_records().is_empty());
        assert_eq!(h.blob.object_count(), 0);
    }
}
