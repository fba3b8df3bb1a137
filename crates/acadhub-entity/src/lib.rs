//! # acadhub-entity
//!
//! Domain entity models for AcadHub. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod file;
pub mod tag;
pub mod user;
