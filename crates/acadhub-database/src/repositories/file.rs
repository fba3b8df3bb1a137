//! File record repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acadhub_core::error::{AppError, ErrorKind};
use acadhub_core::result::AppResult;
use acadhub_entity::file::{CreateFileRecord, FileRecord, FileRecordWithOwner};

/// Persistence seam for file records.
///
/// `delete_by_id` returns whether a row was actually removed so the
/// deletion orchestrator can distinguish a concurrent delete that got
/// there first.
#[async_trait]
pub trait FileRecordStore: Send + Sync + 'static {
    /// Persist a new record together with its tag links.
    async fn insert(&self, data: &CreateFileRecord) -> AppResult<FileRecord>;

    /// Load a record by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>>;

    /// List all records with owner fields and tag names populated.
    async fn list_all(&self) -> AppResult<Vec<FileRecordWithOwner>>;

    /// List the records owned by one user.
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecordWithOwner>>;

    /// Delete a record by id. Returns `true` if a row was removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

const LIST_SQL: &str = "SELECT f.*, u.name AS owner_name, u.account_type AS owner_account_type, \
     COALESCE(array_agg(t.name ORDER BY ft.position) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags \
     FROM file_records f \
     JOIN users u ON u.id = f.owner_id \
     LEFT JOIN file_tags ft ON ft.file_id = f.id \
     LEFT JOIN tags t ON t.id = ft.tag_id";

/// PostgreSQL-backed file record store.
#[derive(Debug, Clone)]
pub struct PostgresFileRecordStore {
    pool: PgPool,
}

impl PostgresFileRecordStore {
    /// Create a new file record store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Reject creation when a required field is missing. The orchestrator
/// validates inputs before any remote call; this check keeps the
/// repository's own invariant independent of its callers.
fn check_required(data: &CreateFileRecord) -> AppResult<()> {
    let required = [
        ("filename", &data.filename),
        ("fileUrl", &data.file_url),
        ("title", &data.title),
        ("subject", &data.subject),
        ("semester", &data.semester),
        ("subjectCode", &data.subject_code),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Missing required field: {field}"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl FileRecordStore for PostgresFileRecordStore {
    async fn insert(&self, data: &CreateFileRecord) -> AppResult<FileRecord> {
        check_required(data)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let record = sqlx::query_as::<_, FileRecord>(
            "INSERT INTO file_records \
             (filename, file_url, view_url, title, subject, semester, subject_code, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&data.filename)
        .bind(&data.file_url)
        .bind(&data.view_url)
        .bind(&data.title)
        .bind(&data.subject)
        .bind(&data.semester)
        .bind(&data.subject_code)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file record", e))?;

        for (position, tag_id) in data.tag_ids.iter().enumerate() {
            sqlx::query("INSERT INTO file_tags (file_id, tag_id, position) VALUES ($1, $2, $3)")
                .bind(record.id)
                .bind(tag_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to link tag", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit file record", e)
        })?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file record", e)
            })
    }

    async fn list_all(&self) -> AppResult<Vec<FileRecordWithOwner>> {
        let sql = format!(
            "{LIST_SQL} GROUP BY f.id, u.name, u.account_type ORDER BY f.created_at DESC"
        );
        sqlx::query_as::<_, FileRecordWithOwner>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list file records", e)
            })
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecordWithOwner>> {
        let sql = format!(
            "{LIST_SQL} WHERE f.owner_id = $1 \
             GROUP BY f.id, u.name, u.account_type ORDER BY f.created_at DESC"
        );
        sqlx::query_as::<_, FileRecordWithOwner>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list owned file records", e)
            })
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete file record", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
