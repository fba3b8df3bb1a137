//! Repository traits and their PostgreSQL implementations.
//!
//! Each module defines the trait the service layer depends on plus the
//! concrete `Postgres*` implementation. Tests substitute in-memory fakes
//! for the traits.

pub mod audit;
pub mod file;
pub mod tag;
pub mod user;

pub use audit::{AuditSink, PostgresAuditSink};
pub use file::{FileRecordStore, PostgresFileRecordStore};
pub use tag::{PostgresTagStore, TagStore};
pub use user::{PostgresUserStore, UserStore};
