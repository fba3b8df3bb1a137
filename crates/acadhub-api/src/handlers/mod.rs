//! HTTP handlers grouped by domain.

pub mod file;
pub mod health;
pub mod user;
