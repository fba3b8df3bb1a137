//! Tag entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A short label attached to file records. Globally unique by canonical
/// name, created lazily on first use, never deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Unique tag identifier.
    pub id: Uuid,
    /// Canonical tag name (trimmed, lowercased).
    pub name: String,
    /// When the tag was first used.
    pub created_at: DateTime<Utc>,
}

/// Canonicalize a client-supplied tag name: trim surrounding whitespace
/// and lowercase. All tag lookups and inserts go through this single
/// normalization so case-variant duplicates collapse to one tag.
pub fn canonical_tag_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
