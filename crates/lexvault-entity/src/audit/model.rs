//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use lexvault_core::events::AuditEvent;
use lexvault_core::types::{AuditLogId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable audit log row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// The user who performed the action.
    pub user_id: UserId,
    /// The action label (e.g. `"LOGIN"`, `"UPDATE_ROLE"`).
    pub action: String,
    /// The type of the affected entity (`"user"`, `"client"`, `"file"`).
    pub entity_type: String,
    /// The affected entity ID (if applicable).
    pub entity_id: Option<Uuid>,
    /// Additional details (JSON).
    pub details: Option<serde_json::Value>,
    /// IP address of the actor.
    pub ip_address: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// An audit row joined with the acting user's identity.
///
/// `email` and `full_name` are `None` when the actor has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogRecord {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// The user who performed the action.
    pub user_id: UserId,
    /// The action label.
    pub action: String,
    /// The type of the affected entity.
    pub entity_type: String,
    /// The affected entity ID.
    pub entity_id: Option<Uuid>,
    /// Additional details.
    pub details: Option<serde_json::Value>,
    /// IP address of the actor.
    pub ip_address: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
    /// Actor e-mail.
    pub email: Option<String>,
    /// Actor display name.
    pub full_name: Option<String>,
}

/// Data required to create a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The user who performed the action.
    pub user_id: UserId,
    /// The action label.
    pub action: String,
    /// Affected entity type.
    pub entity_type: String,
    /// Affected entity ID.
    pub entity_id: Option<Uuid>,
    /// Additional details.
    pub details: Option<serde_json::Value>,
    /// Actor's IP address.
    pub ip_address: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl From<AuditEvent> for CreateAuditLogEntry {
    fn from(event: AuditEvent) -> Self {
        Self {
            user_id: event.actor,
            action: event.action.as_str().to_string(),
            entity_type: event.entity_type,
            entity_id: event.entity_id,
            details: event.details,
            ip_address: event.ip_address,
            created_at: event.occurred_at,
        }
    }
}
