//! Blob store trait for the remote object storage provider.
//!
//! The trait is defined here in `acadhub-core` and implemented by the
//! drive client in `acadhub-storage`; orchestrators hold an
//! `Arc<dyn BlobStore>` so tests can substitute an in-memory fake.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Result of storing a new object in the blob store.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Opaque remote object identifier.
    pub remote_id: String,
    /// Durable download URL.
    pub download_url: String,
    /// Durable inline-view URL (if the provider reports one).
    pub view_url: Option<String>,
}

/// Stable links re-resolved from the provider for an existing object.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ObjectLinks {
    /// Download URL, if the provider reports one.
    pub download_url: Option<String>,
    /// Inline-view URL, if the provider reports one.
    pub view_url: Option<String>,
}

/// Trait for the remote blob store holding raw file bytes.
///
/// Failure contract (mirrored by the error kinds the methods return):
/// `store` fails with `UploadFailed`; `delete_by_id` fails with `NotFound`
/// when the object is already gone remotely and `DeleteFailed` for any
/// other error. `extract_remote_id` returns `None` (not an error) when the
/// URL format is unrecognized; callers treat `None` as "skip remote
/// deletion, proceed with local cleanup".
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Return the provider type name (e.g., "drive").
    fn provider_type(&self) -> &str;

    /// Upload a byte payload under the given display name and MIME type.
    async fn store(
        &self,
        data: Bytes,
        display_name: &str,
        mime_type: &str,
    ) -> AppResult<StoredObject>;

    /// Set the object's ACL to public-read.
    ///
    /// Callers treat failure as non-fatal: an object with a default ACL is
    /// preferable to losing the uploaded bytes.
    async fn grant_public_read(&self, remote_id: &str) -> AppResult<()>;

    /// Re-resolve stable download/view URLs after ACL changes.
    async fn resolve_links(&self, remote_id: &str) -> AppResult<ObjectLinks>;

    /// Delete the object by its remote id.
    async fn delete_by_id(&self, remote_id: &str) -> AppResult<()>;

    /// Parse a stored URL back into the remote object id.
    fn extract_remote_id(&self, file_url: &str) -> Option<String>;

    /// Deterministic download URL constructed from the remote id alone.
    fn fallback_download_url(&self, remote_id: &str) -> String;

    /// Deterministic inline-view URL constructed from the remote id alone.
    fn fallback_view_url(&self, remote_id: &str) -> String;
}
