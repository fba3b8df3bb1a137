//! Upload orchestration.
//!
//! A single upload touches two independent systems: the remote blob store
//! first, the local metadata database second. The ordering is the
//! correctness mechanism — no record is ever written for bytes that were
//! not stored, and a local failure after a successful remote write is
//! surfaced as `InconsistentState` (never swallowed) so operators can
//! reconcile the orphaned remote object.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use acadhub_core::error::AppError;
use acadhub_core::result::AppResult;
use acadhub_core::traits::blobstore::{BlobStore, StoredObject};
use acadhub_database::repositories::{FileRecordStore, TagStore};
use acadhub_entity::audit::AuditAction;
use acadhub_entity::file::{CreateFileRecord, FileRecord};
use acadhub_entity::tag::canonical_tag_name;

use crate::audit::AuditWriter;
use crate::context::RequestContext;

/// Maximum number of tags attachable to one record.
pub const MAX_TAGS: usize = 5;

/// Everything the caller supplies for one upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original client-supplied file name.
    pub filename: String,
    /// MIME type reported by the client.
    pub mime_type: String,
    /// File content bytes.
    pub data: Bytes,
    /// Document title.
    pub title: String,
    /// Subject name.
    pub subject: String,
    /// Semester label.
    pub semester: String,
    /// Subject code.
    pub subject_code: String,
    /// Requested tag names, at most [`MAX_TAGS`].
    pub tags: Vec<String>,
}

/// What a successful upload returns to the caller.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadOutcome {
    /// The new record's id.
    pub id: Uuid,
    /// Durable download URL.
    pub file_url: String,
    /// Durable inline-view URL.
    pub view_url: Option<String>,
}

/// Coordinates receiving an upload, persisting it remotely and locally,
/// and emitting the audit entry.
#[derive(Clone)]
pub struct UploadService {
    blob: Arc<dyn BlobStore>,
    files: Arc<dyn FileRecordStore>,
    tags: Arc<dyn TagStore>,
    audit: AuditWriter,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        blob: Arc<dyn BlobStore>,
        files: Arc<dyn FileRecordStore>,
        tags: Arc<dyn TagStore>,
        audit: AuditWriter,
    ) -> Self {
        Self {
            blob,
            files,
            tags,
            audit,
        }
    }

    /// Performs one upload end to end.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
    ) -> AppResult<UploadOutcome> {
        // All validation happens before any side effect.
        let tag_names = validate(&request)?;

        let stored = self
            .blob
            .store(request.data.clone(), &request.filename, &request.mime_type)
            .await?;

        // Visibility failures degrade gracefully; existence failures do not.
        // A file with a default ACL beats losing the uploaded bytes.
        if let Err(e) = self.blob.grant_public_read(&stored.remote_id).await {
            warn!(
                remote_id = %stored.remote_id,
                error = %e,
                "Public-read grant failed; continuing with default ACL"
            );
        }

        let (file_url, view_url) = self.resolve_urls(&stored).await;

        let record = match self
            .persist(ctx, &request, &tag_names, &file_url, view_url.clone())
            .await
        {
            Ok(record) => record,
            Err(e) => {
                // The remote object now has no local record. Operators
                // reconcile from this log line and the error message.
                error!(
                    remote_id = %stored.remote_id,
                    owner_id = %ctx.user_id,
                    error = %e,
                    "Local persistence failed after remote write; remote object orphaned"
                );
                return Err(AppError::inconsistent_state(format!(
                    "File stored remotely as {} but metadata persistence failed: {}",
                    stored.remote_id, e.message
                )));
            }
        };

        self.audit
            .record(
                ctx.user_id,
                AuditAction::Uploaded,
                Some(record.id),
                &request.filename,
            )
            .await;

        info!(
            user_id = %ctx.user_id,
            record_id = %record.id,
            filename = %record.filename,
            remote_id = %stored.remote_id,
            "Upload completed"
        );

        Ok(UploadOutcome {
            id: record.id,
            file_url: record.file_url,
            view_url: record.view_url,
        })
    }

    /// Re-resolve stable links after the ACL change, falling back to the
    /// deterministic URL templates when the provider cannot answer.
    async fn resolve_urls(&self, stored: &StoredObject) -> (String, Option<String>) {
        let links = match self.blob.resolve_links(&stored.remote_id).await {
            Ok(links) => links,
            Err(e) => {
                warn!(
                    remote_id = %stored.remote_id,
                    error = %e,
                    "Link resolution failed; using constructed URLs"
                );
                Default::default()
            }
        };

        let file_url = links
            .download_url
            .unwrap_or_else(|| self.blob.fallback_download_url(&stored.remote_id));
        let view_url = links
            .view_url
            .or_else(|| Some(self.blob.fallback_view_url(&stored.remote_id)));

        (file_url, view_url)
    }

    /// Resolve tags and write the file record. Everything here is local
    /// persistence; any failure after the remote write maps to
    /// `InconsistentState` at the call site.
    async fn persist(
        &self,
        ctx: &RequestContext,
        request: &UploadRequest,
        tag_names: &[String],
        file_url: &str,
        view_url: Option<String>,
    ) -> AppResult<FileRecord> {
        let mut tag_ids = Vec::with_capacity(tag_names.len());
        for name in tag_names {
            let tag = self.tags.find_or_create(name).await?;
            tag_ids.push(tag.id);
        }

        let data = CreateFileRecord {
            filename: request.filename.clone(),
            file_url: file_url.to_string(),
            view_url,
            title: request.title.clone(),
            subject: request.subject.clone(),
            semester: request.semester.clone(),
            subject_code: request.subject_code.clone(),
            owner_id: ctx.user_id,
            tag_ids,
        };

        self.files.insert(&data).await
    }
}

/// Check all required inputs and return the canonical tag list. Runs
/// before any remote call, so a rejected request has zero side effects.
fn validate(request: &UploadRequest) -> AppResult<Vec<String>> {
    if request.data.is_empty() {
        return Err(AppError::validation("Uploaded file is empty"));
    }
    if request.filename.trim().is_empty() {
        return Err(AppError::validation("Missing required field: filename"));
    }

    let required = [
        ("title", &request.title),
        ("subject", &request.subject),
        ("semester", &request.semester),
        ("subjectcode", &request.subject_code),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    if request.tags.len() > MAX_TAGS {
        return Err(AppError::validation(format!(
            "At most {MAX_TAGS} tags may be attached"
        )));
    }

    let mut tag_names = Vec::with_capacity(request.tags.len());
    for raw in &request.tags {
        let canonical = canonical_tag_name(raw);
        if canonical.is_empty() {
            return Err(AppError::validation("Tag names must not be blank"));
        }
        // Case-variant duplicates collapse; first occurrence wins.
        if !tag_names.contains(&canonical) {
            tag_names.push(canonical);
        }
    }

    Ok(tag_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, TestHarness};
    use acadhub_core::error::ErrorKind;

    fn request_2mb_pdf() -> UploadRequest {
        UploadRequest {
            filename: "calculus-notes.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: Bytes::from(vec![0u8; 2 * 1024 * 1024]),
            title: "Calculus Notes".to_string(),
            subject: "Maths".to_string(),
            semester: "Third".to_string(),
            subject_code: "MTH201".to_string(),
            tags: vec!["calc".to_string(), "exam".to_string()],
        }
    }

    #[tokio::test]
    async fn test_successful_upload_creates_record_object_and_audit() {
        let h = TestHarness::new();
        let ctx = test_context();
        let service = h.upload_service();

        let outcome = service.upload(&ctx, request_2mb_pdf()).await.unwrap();

        assert!(!outcome.file_url.is_empty());
        assert_eq!(h.blob.object_count(), 1);

        let records = h.files.all_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Calculus Notes");
        assert_eq!(record.subject, "Maths");
        assert_eq!(record.semester, "Third");
        assert_eq!(record.subject_code, "MTH201");
        assert_eq!(record.owner_id, ctx.user_id);
        assert_eq!(h.files.tag_names_for(record.id), vec!["calc", "exam"]);

        // The stored URL must resolve back to the stored remote object.
        let remote_id = h.blob.extract_remote_id(&record.file_url).unwrap();
        assert!(h.blob.contains(&remote_id));

        let audit = h.audit.entries();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::Uploaded);
        assert_eq!(audit[0].target_id, Some(record.id));
        assert_eq!(audit[0].detail, "calculus-notes.pdf");
    }

    #[tokio::test]
    async fn test_empty_file_rejected_before_any_remote_call() {
        let h = TestHarness::new();
        let service = h.upload_service();

        let mut request = request_2mb_pdf();
        request.data = Bytes::new();

        let err = service.upload(&test_context(), request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(h.blob.store_calls(), 0);
        assert_eq!(h.files.all_records().len(), 0);
    }

    #[tokio::test]
    async fn test_missing_required_field_rejected() {
        let h = TestHarness::new();
        let service = h.upload_service();

        let mut request = request_2mb_pdf();
        request.subject = "   ".to_string();

        let err = service.upload(&test_context(), request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(h.blob.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_sixth_tag_rejected_without_remote_object() {
        let h = TestHarness::new();
        let service = h.upload_service();

        let mut request = request_2mb_pdf();
        request.tags = (1..=6).map(|i| format!("tag{i}")).collect();

        let err = service.upload(&test_context(), request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(h.blob.store_calls(), 0);
        assert_eq!(h.blob.object_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_store_failure_leaves_no_local_trace() {
        let h = TestHarness::new();
        h.blob.fail_store();
        let service = h.upload_service();

        let err = service
            .upload(&test_context(), request_2mb_pdf())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::UploadFailed);
        assert_eq!(h.files.all_records().len(), 0);
        assert_eq!(h.audit.entries().len(), 0);
    }

    #[tokio::test]
    async fn test_local_persist_failure_reports_inconsistent_state() {
        let h = TestHarness::new();
        h.files.fail_insert();
        let service = h.upload_service();

        let err = service
            .upload(&test_context(), request_2mb_pdf())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InconsistentState);
        // The orphaned remote object is real; the message names it.
        assert_eq!(h.blob.object_count(), 1);
        let remote_id = h.blob.remote_ids().pop().unwrap();
        assert!(err.message.contains(&remote_id));
        assert_eq!(h.audit.entries().len(), 0);
    }

    #[tokio::test]
    async fn test_permission_grant_failure_is_not_fatal() {
        let h = TestHarness::new();
        h.blob.fail_grant();
        let service = h.upload_service();

        let outcome = service
            .upload(&test_context(), request_2mb_pdf())
            .await
            .unwrap();

        assert!(!outcome.file_url.is_empty());
        assert_eq!(h.files.all_records().len(), 1);
    }

    #[tokio::test]
    async fn test_link_resolution_failure_falls_back_to_constructed_url() {
        let h = TestHarness::new();
        h.blob.fail_resolve();
        let service = h.upload_service();

        let outcome = service
            .upload(&test_context(), request_2mb_pdf())
            .await
            .unwrap();

        let remote_id = h.blob.remote_ids().pop().unwrap();
        assert_eq!(outcome.file_url, h.blob.fallback_download_url(&remote_id));
        assert_eq!(
            outcome.view_url.as_deref(),
            Some(h.blob.fallback_view_url(&remote_id).as_str())
        );
    }

    #[tokio::test]
    async fn test_case_variant_tags_collapse_to_one() {
        let h = TestHarness::new();
        let service = h.upload_service();

        let mut request = request_2mb_pdf();
        request.tags = vec![
            "  Calc ".to_string(),
            "CALC".to_string(),
            "exam".to_string(),
        ];

        service.upload(&test_context(), request).await.unwrap();

        let records = h.files.all_records();
        assert_eq!(h.files.tag_names_for(records[0].id), vec!["calc", "exam"]);
        assert_eq!(h.tags.names().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_tag_rejected() {
        let h = TestHarness::new();
        let service = h.upload_service();

        let mut request = request_2mb_pdf();
        request.tags = vec!["  ".to_string()];

        let err = service.upload(&test_context(), request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(h.blob.store_calls(), 0);
    }
}
