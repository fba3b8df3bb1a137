//! Uploaded document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::AccountType;

/// One uploaded document: the local metadata row referencing a remote
/// object in the blob store.
///
/// The record and its remote object are two physical resources
/// representing one logical entity; they are created together and
/// destroyed together under normal operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Original client-supplied file name.
    pub filename: String,
    /// Durable download URL into the blob store. Encodes the remote
    /// object id so deletion can recover it.
    pub file_url: String,
    /// Durable inline-view URL (if resolvable at upload time).
    pub view_url: Option<String>,
    /// Document title.
    pub title: String,
    /// Subject name.
    pub subject: String,
    /// Semester label.
    pub semester: String,
    /// Subject code (e.g., "MTH201").
    pub subject_code: String,
    /// The uploading user. Immutable after creation.
    pub owner_id: Uuid,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRecord {
    /// Original client-supplied file name.
    pub filename: String,
    /// Durable download URL.
    pub file_url: String,
    /// Durable inline-view URL.
    pub view_url: Option<String>,
    /// Document title.
    pub title: String,
    /// Subject name.
    pub subject: String,
    /// Semester label.
    pub semester: String,
    /// Subject code.
    pub subject_code: String,
    /// The uploading user.
    pub owner_id: Uuid,
    /// Resolved tag ids to link, in request order (at most 5).
    pub tag_ids: Vec<Uuid>,
}

/// Listing projection: a file record with owner summary fields and tag
/// names populated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecordWithOwner {
    /// The file record itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: FileRecord,
    /// Owner's display name.
    pub owner_name: String,
    /// Owner's account type.
    pub owner_account_type: AccountType,
    /// Tag names attached to the record, in link order.
    pub tags: Vec<String>,
}
