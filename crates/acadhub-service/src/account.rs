//! Account service: signup, login, profile lookup.
//!
//! Auth is a thin wrapper around JWT issuance; the lifecycle core only
//! requires that caller identity is known before upload/delete.

use std::sync::Arc;

use tracing::info;

use acadhub_auth::jwt::JwtEncoder;
use acadhub_auth::password::PasswordHasher;
use acadhub_core::error::AppError;
use acadhub_core::result::AppResult;
use acadhub_database::repositories::UserStore;
use acadhub_entity::user::{AccountType, CreateUser, User};

use crate::context::RequestContext;

/// Data supplied on signup.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SignupRequest {
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
    /// Plaintext password.
    pub password: String,
}

/// Handles registration and credential verification.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
    password_min_length: usize,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish()
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        encoder: JwtEncoder,
        password_min_length: usize,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            password_min_length,
        }
    }

    /// Register a new user and issue a token.
    pub async fn signup(&self, request: SignupRequest) -> AppResult<(User, String)> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Missing required field: name"));
        }
        if !request.email.contains('@') {
            return Err(AppError::validation("Invalid email address"));
        }
        if request.password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }
        if request.account_type == AccountType::Student
            && request
                .enrollment_no
                .as_deref()
                .is_none_or(|e| e.trim().is_empty())
        {
            return Err(AppError::validation(
                "Students must provide an enrollment number",
            ));
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let user = self
            .users
            .create(&CreateUser {
                account_type: request.account_type,
                name: request.name,
                email: request.email,
                enrollment_no: request.enrollment_no,
                semester: request.semester,
                password_hash,
            })
            .await?;

        let token = self
            .encoder
            .generate_token(user.id, user.account_type, &user.name)?;

        info!(user_id = %user.id, "User registered");
        Ok((user, token))
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, String)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid email or password"));
        }

        let token = self
            .encoder
            .generate_token(user.id, user.account_type, &user.name)?;

        info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Load the caller's profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
