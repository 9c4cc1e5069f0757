//! Role-based access control (RBAC).

pub mod enforcer;
pub mod policies;

pub use enforcer::RbacEnforcer;
pub use policies::{RbacPolicies, SystemPermission};
