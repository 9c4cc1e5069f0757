//! User entity model.

use chrono::{DateTime, Utc};
use lexvault_core::types::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::UserRole;

/// A registered LexVault account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login e-mail, stored lower-case.
    pub email: String,
    /// Argon2id PHC hash string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// RBAC role.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public view of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

/// The account fields returned to callers (never the hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID.
    pub id: UserId,
    /// Login e-mail.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// RBAC role.
    pub role: UserRole,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Normalized e-mail.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_skips_password_hash() {
        let user = User {
            id: UserId::new(),
            email: "clerk@firm.test".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            full_name: "Court Clerk".into(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());

        let profile = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(profile["fullName"], "Court Clerk");
        assert_eq!(profile["role"], "user");
    }
}
