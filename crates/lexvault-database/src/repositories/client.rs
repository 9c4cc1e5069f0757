//! Client repository implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::PgPool;

use lexvault_core::error::{AppError, ErrorKind};
use lexvault_core::result::AppResult;
use lexvault_core::traits::ClientDirectory;
use lexvault_core::types::ClientId;
use lexvault_entity::client::{Client, ClientSummary, CreateClient};

use super::is_unique_violation;

/// Repository for client records.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    /// Create a new client repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a client by primary key.
    pub async fn find_by_id(&self, id: ClientId) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find client", e))
    }

    /// List clients, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<ClientSummary>> {
        sqlx::query_as::<_, ClientSummary>(
            "SELECT id, name, contact_person, folder_path, created_at \
             FROM clients ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list clients", e))
    }

    /// Insert a client row for an already provisioned folder tree.
    pub async fn create(&self, data: &CreateClient) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients \
               (id, name, contact_person, contact_email, contact_phone, folder_path, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(ClientId::new())
        .bind(&data.name)
        .bind(&data.contact_person)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(&data.folder_path)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Client folder '{}' is already registered", data.folder_path))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create client", e)
            }
        })
    }
}

#[async_trait]
impl ClientDirectory for ClientRepository {
    async fn client_root(&self, client_id: ClientId) -> AppResult<Option<PathBuf>> {
        sqlx::query_scalar::<_, String>("SELECT folder_path FROM clients WHERE id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map(|path| path.map(PathBuf::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to look up client folder", e)
            })
    }
}
