//! Audit trail events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A user signed in.
    Login,
    /// An administrator created a user account.
    CreateUser,
    /// An administrator changed a user's role.
    UpdateRole,
    /// An administrator deleted a user account.
    DeleteUser,
    /// A client record and its folder tree were provisioned.
    CreateClient,
    /// A file was uploaded into a client folder.
    UploadFile,
    /// Scanned images were converted into a PDF.
    ScanDocument,
    /// A file was renamed.
    RenameFile,
}

impl AuditAction {
    /// The persisted action label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::CreateUser => "CREATE_USER",
            Self::UpdateRole => "UPDATE_ROLE",
            Self::DeleteUser => "DELETE_USER",
            Self::CreateClient => "CREATE_CLIENT",
            Self::UploadFile => "UPLOAD_FILE",
            Self::ScanDocument => "SCAN_DOCUMENT",
            Self::RenameFile => "RENAME_FILE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single auditable occurrence, ready to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The acting user.
    pub actor: UserId,
    /// What happened.
    pub action: AuditAction,
    /// Kind of entity affected (`"user"`, `"client"`, `"file"`).
    pub entity_type: String,
    /// The affected entity, when it has a database identity.
    pub entity_id: Option<Uuid>,
    /// Free-form structured details.
    pub details: Option<serde_json::Value>,
    /// Caller IP address, when known.
    pub ip_address: Option<String>,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Start a new event for the given actor and action.
    pub fn new(actor: UserId, action: AuditAction, entity_type: impl Into<String>) -> Self {
        Self {
            actor,
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            details: None,
            ip_address: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attach the affected entity.
    pub fn entity(mut self, id: impl Into<Uuid>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Attach structured details.
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the caller's IP address.
    pub fn ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_labels_match_serde_names() {
        for action in [
            AuditAction::Login,
            AuditAction::UpdateRole,
            AuditAction::ScanDocument,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn test_builder_attaches_optional_fields() {
        let actor = UserId::new();
        let event = AuditEvent::new(actor, AuditAction::RenameFile, "file")
            .details(serde_json::json!({ "from": "a.pdf", "to": "b.pdf" }))
            .ip(Some("10.0.0.7".into()));

        assert_eq!(event.actor, actor);
        assert!(event.entity_id.is_none());
        assert_eq!(event.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(event.details.unwrap()["to"], "b.pdf");
    }
}
