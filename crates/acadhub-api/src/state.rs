//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use acadhub_auth::jwt::decoder::JwtDecoder;
use acadhub_core::config::AppConfig;
use acadhub_service::account::AccountService;
use acadhub_service::file::delete::DeletionService;
use acadhub_service::file::query::FileQueryService;
use acadhub_service::file::upload::UploadService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheaply cloneable.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, used by health checks.
    pub db_pool: PgPool,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Account registration and login.
    pub account_service: Arc<AccountService>,
    /// Upload orchestrator.
    pub upload_service: Arc<UploadService>,
    /// Deletion orchestrator.
    pub deletion_service: Arc<DeletionService>,
    /// Listing queries.
    pub query_service: Arc<FileQueryService>,
}
