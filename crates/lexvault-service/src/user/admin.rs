//! Admin user management: accounts, roles, and the audit trail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use lexvault_auth::password::{PasswordHasher, PasswordValidator};
use lexvault_auth::rbac::{RbacEnforcer, SystemPermission};
use lexvault_core::error::AppError;
use lexvault_core::events::{AuditAction, AuditEvent};
use lexvault_core::result::AppResult;
use lexvault_core::traits::AuditSink;
use lexvault_core::types::UserId;
use lexvault_database::repositories::{AuditLogRepository, UserRepository};
use lexvault_entity::audit::AuditLogRecord;
use lexvault_entity::user::{CreateUser, User, UserProfile, UserRole};

use crate::audit;
use crate::context::RequestContext;

/// Default number of audit entries returned.
pub const DEFAULT_AUDIT_LIMIT: i64 = 100;

const MAX_AUDIT_LIMIT: i64 = 1000;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// E-mail (unique).
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    /// Role: `admin`, `manager`, or `user`.
    pub role: String,
}

impl CreateUserRequest {
    /// Trim and lower-case the e-mail, trim the name.
    fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            full_name: self.full_name.trim().to_string(),
            ..self
        }
    }
}

/// Handles administrative user management operations.
#[derive(Clone)]
pub struct AdminUserService {
    user_repo: Arc<UserRepository>,
    audit_repo: Arc<AuditLogRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    rbac: Arc<RbacEnforcer>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for AdminUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserService").finish()
    }
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        audit_repo: Arc<AuditLogRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        rbac: Arc<RbacEnforcer>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            user_repo,
            audit_repo,
            hasher,
            validator,
            rbac,
            audit,
        }
    }

    /// Lists all users, newest first.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<UserProfile>> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;

        let users = self.user_repo.find_all().await?;
        Ok(users.iter().map(User::profile).collect())
    }

    /// Validate a creation request and insert the account.
    async fn insert_user(&self, req: CreateUserRequest) -> AppResult<User> {
        let req = req.normalized();
        req.validate()
            .map_err(|e| AppError::invalid_input(format!("Invalid user: {e}")))?;
        let role: UserRole = req.role.parse()?;
        self.validator.validate(&req.password)?;

        let password_hash = self.hasher.hash_password(&req.password)?;
        self.user_repo
            .create(&CreateUser {
                email: req.email,
                password_hash,
                full_name: req.full_name,
                role,
            })
            .await
    }

    /// Creates a new user.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> AppResult<UserProfile> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;

        let user = self.insert_user(req).await?;

        audit::record(
            self.audit.as_ref(),
            AuditEvent::new(ctx.user_id, AuditAction::CreateUser, "user")
                .entity(user.id)
                .details(serde_json::json!({ "email": user.email }))
                .ip(ctx.ip_address.clone()),
        )
        .await;

        info!(user_id = %user.id, email = %user.email, role = %user.role, "User created");
        Ok(user.profile())
    }

    /// Create the first administrator from the command line.
    ///
    /// Runs outside any request context, so it is neither gated nor audited.
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<UserProfile> {
        let user = self
            .insert_user(CreateUserRequest {
                email: email.to_string(),
                password: password.to_string(),
                full_name: full_name.to_string(),
                role: UserRole::Admin.to_string(),
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "Administrator created");
        Ok(user.profile())
    }

    /// Changes a user's role.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        role: UserRole,
    ) -> AppResult<UserProfile> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;

        let existing = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        let updated = self.user_repo.update_role(user_id, role).await?;

        audit::record(
            self.audit.as_ref(),
            AuditEvent::new(ctx.user_id, AuditAction::UpdateRole, "user")
                .entity(user_id)
                .details(serde_json::json!({ "old": existing.role, "new": role }))
                .ip(ctx.ip_address.clone()),
        )
        .await;

        info!(%user_id, old = %existing.role, new = %role, "User role changed");
        Ok(updated.profile())
    }

    /// Deletes a user. Admins cannot delete themselves.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<()> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;

        if user_id == ctx.user_id {
            return Err(AppError::invalid_input("Cannot delete your own account"));
        }

        if !self.user_repo.delete(user_id).await? {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        audit::record(
            self.audit.as_ref(),
            AuditEvent::new(ctx.user_id, AuditAction::DeleteUser, "user")
                .entity(user_id)
                .ip(ctx.ip_address.clone()),
        )
        .await;

        info!(%user_id, "User deleted");
        Ok(())
    }

    /// The most recent audit entries, newest first (100 by default).
    pub async fn audit_logs(
        &self,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> AppResult<Vec<AuditLogRecord>> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::AuditView)?;

        let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT);
        self.audit_repo.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = CreateUserRequest {
            email: "  Clerk@Firm.Test ".into(),
            password: "Paralegal1!".into(),
            full_name: " Court Clerk ".into(),
            role: "user".into(),
        }
        .normalized();
        assert_eq!(valid.email, "clerk@firm.test");
        assert_eq!(valid.full_name, "Court Clerk");
        assert!(valid.validate().is_ok());

        let invalid = CreateUserRequest {
            email: "not-an-email".into(),
            full_name: "   ".into(),
            ..valid
        }
        .normalized();
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("full_name"));
    }
}
