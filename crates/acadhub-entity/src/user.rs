//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The kind of account a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A student account (carries an enrollment number).
    Student,
    /// A faculty account.
    Faculty,
}

/// A registered user. The lifecycle core only consumes `id` and
/// `account_type`; the remaining fields exist for account management.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Account type.
    pub account_type: AccountType,
    /// Display name.
    pub name: String,
    /// Email address, unique.
    pub email: String,
    /// Enrollment number (students only).
    pub enrollment_no: Option<String>,
    /// Current semester (students only).
    pub semester: Option<String>,
    /// Argon2id password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Account type.
    pub account_type: AccountType,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Enrollment number (students only).
    pub enrollment_no: Option<String>,
    /// Current semester.
    pub semester: Option<String>,
    /// Argon2id password hash.
    pub password_hash: String,
}
