//! Tag repository.

use async_trait::async_trait;
use sqlx::PgPool;

use acadhub_core::error::{AppError, ErrorKind};
use acadhub_core::result::AppResult;
use acadhub_entity::tag::Tag;

/// Persistence seam for tags. Names passed in must already be canonical
/// (see [`acadhub_entity::tag::canonical_tag_name`]).
#[async_trait]
pub trait TagStore: Send + Sync + 'static {
    /// Return the tag with the given canonical name, creating it on first use.
    async fn find_or_create(&self, name: &str) -> AppResult<Tag>;

    /// List all known tag names.
    async fn list_names(&self) -> AppResult<Vec<String>>;
}

/// PostgreSQL-backed tag store.
#[derive(Debug, Clone)]
pub struct PostgresTagStore {
    pool: PgPool,
}

impl PostgresTagStore {
    /// Create a new tag store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for PostgresTagStore {
    async fn find_or_create(&self, name: &str) -> AppResult<Tag> {
        // The no-op DO UPDATE makes the upsert return the existing row.
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert tag", e))
    }

    async fn list_names(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }
}
