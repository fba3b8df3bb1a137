//! # acadhub-database
//!
//! PostgreSQL connection management, migrations, and concrete repository
//! implementations for all AcadHub entities. The repository traits defined
//! under [`repositories`] are the seams the service layer depends on.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
