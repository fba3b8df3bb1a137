//! # acadhub-api
//!
//! HTTP API layer for AcadHub built on Axum.
//!
//! Provides the REST endpoints, middleware (auth, CORS, logging),
//! extractors, and DTOs. Error responses come from the `IntoResponse`
//! impl on `AppError` in `acadhub-core`.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use state::AppState;
