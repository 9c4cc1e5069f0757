//! RBAC enforcement.

use lexvault_core::error::AppError;
use lexvault_entity::user::UserRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Checks roles against the policy set.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ok(())` when `role` holds `permission`, an authorization error
    /// otherwise.
    pub fn require_permission(
        &self,
        role: UserRole,
        permission: SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            tracing::debug!(%role, ?permission, "Permission denied");
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }
}
