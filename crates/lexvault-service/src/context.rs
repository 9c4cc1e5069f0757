//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lexvault_core::types::UserId;
use lexvault_entity::user::UserRole;

/// Who is acting, from where, and when.
///
/// Produced by [`AuthService::authenticate`](crate::AuthService::authenticate)
/// and passed into every service method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's e-mail.
    pub email: String,
    /// The user's current role.
    pub role: UserRole,
    /// Caller IP address, when known.
    pub ip_address: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        role: UserRole,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            ip_address,
            request_time: Utc::now(),
        }
    }
}
