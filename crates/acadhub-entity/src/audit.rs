//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The mutating action an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "lowercase")]
pub enum AuditAction {
    /// A file was uploaded.
    Uploaded,
    /// A file was deleted.
    Deleted,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uploaded => write!(f, "Uploaded"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// An immutable audit log entry recording a mutating operation.
///
/// Created once, never mutated or deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// The action that was performed.
    pub action: AuditAction,
    /// The target file record (if applicable).
    pub target_id: Option<Uuid>,
    /// Free-text detail (e.g., the original filename).
    pub detail: String,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The user who performed the action.
    pub actor_id: Uuid,
    /// The action performed.
    pub action: AuditAction,
    /// Target file record id.
    pub target_id: Option<Uuid>,
    /// Free-text detail.
    pub detail: String,
}
