//! Audit log repository.

use async_trait::async_trait;
use sqlx::PgPool;

use acadhub_core::error::{AppError, ErrorKind};
use acadhub_core::result::AppResult;
use acadhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

/// Append-only sink for audit log entries. This core never reads the
/// audit log back; it is write-only observability.
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    /// Append one immutable audit entry.
    async fn append(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;
}

/// PostgreSQL-backed audit sink.
#[derive(Debug, Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Create a new audit sink.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn append(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (actor_id, action, target_id, detail) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.actor_id)
        .bind(data.action)
        .bind(data.target_id)
        .bind(&data.detail)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append audit entry", e))
    }
}
