//! Document service: listing, search, upload, scan, rename, and download
//! within a client's folder tree.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use lexvault_auth::rbac::{RbacEnforcer, SystemPermission};
use lexvault_core::error::AppError;
use lexvault_core::events::{AuditAction, AuditEvent};
use lexvault_core::result::AppResult;
use lexvault_core::traits::{AuditSink, ClientDirectory};
use lexvault_core::types::ClientId;
use lexvault_entity::document::{
    DownloadedFile, FileListing, FolderListing, RenameReceipt, ScanReceipt, SearchResults,
    UploadReceipt,
};
use lexvault_storage::{DocumentStore, ScanImage};

use crate::audit;
use crate::context::RequestContext;

/// Resolves clients to their folder trees and delegates to the store.
///
/// Mutations are audited whether they succeed or fail.
#[derive(Clone)]
pub struct DocumentService {
    directory: Arc<dyn ClientDirectory>,
    store: Arc<DocumentStore>,
    rbac: Arc<RbacEnforcer>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("store", &self.store)
            .finish()
    }
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        directory: Arc<dyn ClientDirectory>,
        store: Arc<DocumentStore>,
        rbac: Arc<RbacEnforcer>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            directory,
            store,
            rbac,
            audit,
        }
    }

    async fn client_root(&self, client_id: ClientId) -> AppResult<PathBuf> {
        self.directory
            .client_root(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Client not found"))
    }

    async fn record_outcome<T>(
        &self,
        ctx: &RequestContext,
        action: AuditAction,
        client_id: ClientId,
        mut details: serde_json::Value,
        result: &AppResult<T>,
    ) {
        details["success"] = json!(result.is_ok());
        if let Err(e) = result {
            details["error"] = json!(e.to_string());
        }
        audit::record(
            self.audit.as_ref(),
            AuditEvent::new(ctx.user_id, action, "document")
                .entity(client_id)
                .details(details)
                .ip(ctx.ip_address.clone()),
        )
        .await;
    }

    /// Sub-folders of the client root.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
    ) -> AppResult<FolderListing> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentRead)?;
        let root = self.client_root(client_id).await?;
        Ok(FolderListing {
            folders: self.store.list_folders(&root).await?,
        })
    }

    /// Files directly inside one folder.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
        folder: &str,
    ) -> AppResult<FileListing> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentRead)?;
        let root = self.client_root(client_id).await?;
        Ok(FileListing {
            files: self.store.list_files(&root, folder).await?,
        })
    }

    /// Case-insensitive substring search across the client's folders.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
        query: &str,
    ) -> AppResult<SearchResults> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentRead)?;
        let root = self.client_root(client_id).await?;
        let results = self.store.search(&root, query).await?;
        debug!(%client_id, query, hits = results.len(), "Search finished");
        Ok(SearchResults { results })
    }

    /// Store one file under a versioned name.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
        folder: &str,
        file_name: &str,
        data: &[u8],
    ) -> AppResult<UploadReceipt> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentWrite)?;
        let root = self.client_root(client_id).await?;

        let result = self
            .store
            .upload(&root, folder, file_name, data)
            .await
            .map(|stored_as| UploadReceipt { stored_as });

        let details = json!({
            "folder": folder,
            "fileName": file_name,
            "size": data.len(),
            "storedAs": result.as_ref().ok().map(|r| r.stored_as.clone()),
        });
        self.record_outcome(ctx, AuditAction::UploadFile, client_id, details, &result)
            .await;
        result
    }

    /// Convert scanned page images into one PDF.
    pub async fn scan(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
        folder: &str,
        images: Vec<ScanImage>,
        keep_originals: Option<bool>,
    ) -> AppResult<ScanReceipt> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentWrite)?;
        let root = self.client_root(client_id).await?;

        let pages = images.len();
        let result = self.store.scan(&root, folder, images, keep_originals).await;

        let details = json!({
            "folder": folder,
            "pages": pages,
            "pdf": result.as_ref().ok().map(|r| r.pdf.clone()),
            "originals": result.as_ref().ok().map(|r| r.originals.clone()),
        });
        self.record_outcome(ctx, AuditAction::ScanDocument, client_id, details, &result)
            .await;
        result
    }

    /// Rename a file to a versioned form of `new_name`.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
        folder: &str,
        old_name: &str,
        new_name: &str,
    ) -> AppResult<RenameReceipt> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentWrite)?;
        let root = self.client_root(client_id).await?;

        let result = self
            .store
            .rename(&root, folder, old_name, new_name)
            .await
            .map(|final_name| RenameReceipt { final_name });

        let details = json!({
            "folder": folder,
            "oldName": old_name,
            "newName": new_name,
            "finalName": result.as_ref().ok().map(|r| r.final_name.clone()),
        });
        self.record_outcome(ctx, AuditAction::RenameFile, client_id, details, &result)
            .await;
        result
    }

    /// Read a file's contents.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        client_id: ClientId,
        folder: &str,
        file_name: &str,
    ) -> AppResult<DownloadedFile> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::DocumentRead)?;
        let root = self.client_root(client_id).await?;
        self.store.read(&root, folder, file_name).await
    }
}
