//! Client entity model.

use chrono::{DateTime, Utc};
use lexvault_core::types::ClientId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A client of the firm, owning one folder tree on the storage volume.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Unique client identifier.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Primary contact.
    pub contact_person: Option<String>,
    /// Contact e-mail.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Absolute path of the client root. Fixed at creation.
    pub folder_path: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the client was created.
    pub created_at: DateTime<Utc>,
}

/// The columns shown in client listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientSummary {
    /// Unique client identifier.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Primary contact.
    pub contact_person: Option<String>,
    /// Absolute path of the client root.
    pub folder_path: String,
    /// When the client was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a client row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    /// Client name.
    pub name: String,
    /// Primary contact.
    pub contact_person: Option<String>,
    /// Contact e-mail.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Absolute path of the already provisioned client root.
    pub folder_path: String,
    /// Free-form notes.
    pub notes: Option<String>,
}
