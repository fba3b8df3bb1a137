//! Route definitions for the AcadHub HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_size_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(user_routes())
        .merge(file_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Account endpoints: signup, login, me.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(handlers::user::signup))
        .route("/user/login", post(handlers::user::login))
        .route("/user/me", get(handlers::user::me))
}

/// File upload, listing, deletion, and tags.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/file/upload", post(handlers::file::upload_file))
        .route("/file/", get(handlers::file::list_files))
        .route("/file/userfiles", get(handlers::file::list_user_files))
        .route("/file/delete/{id}", delete(handlers::file::delete_file))
        .route("/file/get-tags", get(handlers::file::get_tags))
}

/// Health check endpoint (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
