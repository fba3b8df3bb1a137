//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use acadhub_entity::user::AccountType;

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's account type at the time the JWT was issued.
    pub account_type: AccountType,
    /// Display name (convenience field from JWT claims).
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, account_type: AccountType, name: String) -> Self {
        Self {
            user_id,
            account_type,
            name,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the caller holds a faculty account.
    pub fn is_faculty(&self) -> bool {
        matches!(self.account_type, AccountType::Faculty)
    }
}
