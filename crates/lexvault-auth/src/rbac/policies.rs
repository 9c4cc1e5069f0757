//! Role-to-permission mapping.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use lexvault_entity::user::UserRole;

/// A system-level permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// List, create, re-role, and delete user accounts.
    UserManage,
    /// Read the audit trail.
    AuditView,
    /// Provision new clients.
    ClientCreate,
    /// List and inspect clients.
    ClientRead,
    /// List, search, and download documents.
    DocumentRead,
    /// Upload, scan, and rename documents.
    DocumentWrite,
}

/// Maps each role to its allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use SystemPermission::*;

        let user: HashSet<_> = [ClientRead, DocumentRead, DocumentWrite].into();
        let mut manager = user.clone();
        manager.insert(ClientCreate);
        let mut admin = manager.clone();
        admin.extend([UserManage, AuditView]);

        let policies = HashMap::from([
            (UserRole::User, user),
            (UserRole::Manager, manager),
            (UserRole::Admin, admin),
        ]);
        Self { policies }
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: UserRole, permission: SystemPermission) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_gates() {
        let p = RbacPolicies::new();

        assert!(p.has_permission(UserRole::Admin, SystemPermission::UserManage));
        assert!(!p.has_permission(UserRole::Manager, SystemPermission::UserManage));
        assert!(!p.has_permission(UserRole::Manager, SystemPermission::AuditView));

        assert!(p.has_permission(UserRole::Manager, SystemPermission::ClientCreate));
        assert!(!p.has_permission(UserRole::User, SystemPermission::ClientCreate));

        for role in [UserRole::Admin, UserRole::Manager, UserRole::User] {
            assert!(p.has_permission(role, SystemPermission::ClientRead));
            assert!(p.has_permission(role, SystemPermission::DocumentRead));
            assert!(p.has_permission(role, SystemPermission::DocumentWrite));
        }
    }
}
