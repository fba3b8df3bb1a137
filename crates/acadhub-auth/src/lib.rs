//! # acadhub-auth
//!
//! Thin authentication layer for AcadHub: HS256 JWT issuance and
//! validation plus Argon2id password hashing. Session management beyond
//! "the caller identity must be known" is out of scope.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
