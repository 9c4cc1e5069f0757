//! Client service: provisioning client records together with their folder
//! tree.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use lexvault_auth::rbac::{RbacEnforcer, SystemPermission};
use lexvault_core::error::AppError;
use lexvault_core::events::{AuditAction, AuditEvent};
use lexvault_core::result::AppResult;
use lexvault_core::traits::AuditSink;
use lexvault_core::types::ClientId;
use lexvault_database::repositories::ClientRepository;
use lexvault_entity::client::{Client, ClientSummary, CreateClient};
use lexvault_storage::DocumentStore;

use crate::audit;
use crate::context::RequestContext;

/// Request to create a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    /// Client name; also the prefix of the folder name.
    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub name: String,
    /// Primary contact.
    pub contact_person: Option<String>,
    /// Contact e-mail.
    #[validate(email(message = "Contact email is not valid"))]
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Creates and reads clients.
#[derive(Clone)]
pub struct ClientService {
    client_repo: Arc<ClientRepository>,
    store: Arc<DocumentStore>,
    rbac: Arc<RbacEnforcer>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for ClientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientService").finish()
    }
}

impl ClientService {
    /// Creates a new client service.
    pub fn new(
        client_repo: Arc<ClientRepository>,
        store: Arc<DocumentStore>,
        rbac: Arc<RbacEnforcer>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            client_repo,
            store,
            rbac,
            audit,
        }
    }

    /// Provision the folder tree, then insert the row.
    ///
    /// A failed insert removes the tree again.
    pub async fn create_client(
        &self,
        ctx: &RequestContext,
        req: CreateClientRequest,
    ) -> AppResult<Client> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ClientCreate)?;

        let req = CreateClientRequest {
            name: req.name.trim().to_string(),
            contact_email: non_blank(req.contact_email),
            contact_person: non_blank(req.contact_person),
            contact_phone: non_blank(req.contact_phone),
            notes: non_blank(req.notes),
        };
        req.validate()
            .map_err(|e| AppError::invalid_input(format!("Invalid client: {e}")))?;

        let root = self.store.create_client_tree(&req.name, Utc::now()).await?;

        let inserted = self
            .client_repo
            .create(&CreateClient {
                name: req.name,
                contact_person: req.contact_person,
                contact_email: req.contact_email,
                contact_phone: req.contact_phone,
                folder_path: root.to_string_lossy().into_owned(),
                notes: req.notes,
            })
            .await;

        let client = match inserted {
            Ok(client) => client,
            Err(e) => {
                if let Err(cleanup) = self.store.remove_client_tree(&root).await {
                    warn!(root = %root.display(), error = %cleanup, "Failed to remove orphaned client folder");
                }
                return Err(e);
            }
        };

        audit::record(
            self.audit.as_ref(),
            AuditEvent::new(ctx.user_id, AuditAction::CreateClient, "client")
                .entity(client.id)
                .details(serde_json::json!({ "name": client.name, "folderPath": client.folder_path }))
                .ip(ctx.ip_address.clone()),
        )
        .await;

        info!(client_id = %client.id, root = %root.display(), "Client created");
        Ok(client)
    }

    /// All clients, newest first.
    pub async fn list_clients(&self, ctx: &RequestContext) -> AppResult<Vec<ClientSummary>> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ClientRead)?;
        self.client_repo.find_all().await
    }

    /// One client by ID.
    pub async fn get_client(&self, ctx: &RequestContext, id: ClientId) -> AppResult<Client> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::ClientRead)?;
        self.client_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {id} not found")))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
