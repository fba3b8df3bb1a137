//! User repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acadhub_core::error::{AppError, ErrorKind};
use acadhub_core::result::AppResult;
use acadhub_entity::user::{CreateUser, User};

/// Persistence seam for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Register a new user.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Load a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Load a user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// PostgreSQL-backed user store.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a new user store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (account_type, name, email, enrollment_no, semester, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.account_type)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.enrollment_no)
        .bind(&data.semester)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict("An account with this email already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }
}
