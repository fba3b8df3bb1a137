//! Best-effort audit log writer.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use acadhub_database::repositories::AuditSink;
use acadhub_entity::audit::{AuditAction, CreateAuditLogEntry};

/// Appends audit entries for every mutating operation.
///
/// Audit is observability, not a transactional requirement: a failed
/// append is logged to the operational channel and never rolls back or
/// blocks the primary operation.
#[derive(Clone)]
pub struct AuditWriter {
    sink: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for AuditWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditWriter").finish()
    }
}

impl AuditWriter {
    /// Creates a new audit writer over the given sink.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append one audit entry. Never fails the caller.
    pub async fn record(
        &self,
        actor_id: Uuid,
        action: AuditAction,
        target_id: Option<Uuid>,
        detail: &str,
    ) {
        let entry = CreateAuditLogEntry {
            actor_id,
            action,
            target_id,
            detail: detail.to_string(),
        };

        if let Err(e) = self.sink.append(&entry).await {
            warn!(
                actor_id = %actor_id,
                action = %action,
                error = %e,
                "Audit append failed; continuing without audit entry"
            );
        }
    }
}
