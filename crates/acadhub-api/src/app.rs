//! Application builder: wires repositories, services, and the router,
//! then serves until shutdown.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;

use acadhub_auth::jwt::decoder::JwtDecoder;
use acadhub_auth::jwt::encoder::JwtEncoder;
use acadhub_auth::password::PasswordHasher;
use acadhub_core::config::AppConfig;
use acadhub_core::error::AppError;
use acadhub_database::repositories::{
    PostgresAuditSink, PostgresFileRecordStore, PostgresTagStore, PostgresUserStore,
};
use acadhub_service::account::AccountService;
use acadhub_service::audit::AuditWriter;
use acadhub_service::file::delete::DeletionService;
use acadhub_service::file::query::FileQueryService;
use acadhub_service::file::upload::UploadService;
use acadhub_storage::drive::DriveClient;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the shared application state from configuration and a
/// connected database pool.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> Result<AppState, AppError> {
    let drive = Arc::new(DriveClient::new(config.drive.clone())?);

    let files = Arc::new(PostgresFileRecordStore::new(db_pool.clone()));
    let tags = Arc::new(PostgresTagStore::new(db_pool.clone()));
    let users = Arc::new(PostgresUserStore::new(db_pool.clone()));
    let audit_sink = Arc::new(PostgresAuditSink::new(db_pool.clone()));
    let audit = AuditWriter::new(audit_sink);

    let jwt_encoder = JwtEncoder::new(&config.auth);
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let hasher = PasswordHasher::new();

    let account_service = Arc::new(AccountService::new(
        users,
        hasher,
        jwt_encoder,
        config.auth.password_min_length,
    ));
    let upload_service = Arc::new(UploadService::new(
        drive.clone(),
        files.clone(),
        tags.clone(),
        audit.clone(),
    ));
    let deletion_service = Arc::new(DeletionService::new(drive, files.clone(), audit));
    let query_service = Arc::new(FileQueryService::new(files, tags));

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        jwt_decoder,
        account_service,
        upload_service,
        deletion_service,
        query_service,
    })
}

/// Runs the AcadHub server until SIGINT/SIGTERM.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config, db_pool)?;
    let pool = state.db_pool.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(address = %addr, "AcadHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Shutting down, draining connections");
    tokio::time::sleep(grace).await;
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
