//! Shared fakes for service tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use lexvault_auth::rbac::RbacEnforcer;
use lexvault_core::config::StorageConfig;
use lexvault_core::error::AppError;
use lexvault_core::events::AuditEvent;
use lexvault_core::result::AppResult;
use lexvault_core::traits::{AuditSink, ClientDirectory};
use lexvault_core::types::{ClientId, UserId};
use lexvault_entity::user::UserRole;
use lexvault_service::{DocumentService, RequestContext};
use lexvault_storage::DocumentStore;

/// Client roots held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    roots: Mutex<HashMap<ClientId, PathBuf>>,
}

impl InMemoryDirectory {
    pub fn insert(&self, id: ClientId, root: PathBuf) {
        self.roots.lock().unwrap().insert(id, root);
    }
}

#[async_trait]
impl ClientDirectory for InMemoryDirectory {
    async fn client_root(&self, client_id: ClientId) -> AppResult<Option<PathBuf>> {
        Ok(self.roots.lock().unwrap().get(&client_id).cloned())
    }
}

/// Keeps every recorded event.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Rejects every event.
#[derive(Debug, Default)]
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _event: AuditEvent) -> AppResult<()> {
        Err(AppError::database("audit table unavailable"))
    }
}

pub fn context(role: UserRole) -> RequestContext {
    RequestContext::new(UserId::new(), "paralegal@firm.test", role, Some("10.0.0.7".into()))
}

pub fn storage_config(root: &Path) -> StorageConfig {
    StorageConfig {
        storage_root: root.to_string_lossy().into_owned(),
        max_file_size_bytes: 1024 * 1024,
        max_batch_files: 4,
        ..StorageConfig::default()
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// A document service over a temp storage root with one provisioned client.
pub struct Harness {
    pub service: DocumentService,
    pub store: Arc<DocumentStore>,
    pub audit: Arc<RecordingAuditSink>,
    pub client_id: ClientId,
    pub client_root: PathBuf,
}

impl Harness {
    pub async fn new(storage_root: &Path) -> Self {
        Self::with_sink(storage_root, None).await
    }

    pub async fn with_sink(storage_root: &Path, sink: Option<Arc<dyn AuditSink>>) -> Self {
        let store = Arc::new(DocumentStore::new(storage_config(storage_root)));
        let client_root = store
            .create_client_tree("Acme Holdings", Utc::now())
            .await
            .unwrap();

        let directory = Arc::new(InMemoryDirectory::default());
        let client_id = ClientId::new();
        directory.insert(client_id, client_root.clone());

        let audit = Arc::new(RecordingAuditSink::default());
        let sink: Arc<dyn AuditSink> = sink.unwrap_or_else(|| audit.clone());
        let service = DocumentService::new(
            directory,
            store.clone(),
            Arc::new(RbacEnforcer::new()),
            sink,
        );

        Self {
            service,
            store,
            audit,
            client_id,
            client_root,
        }
    }
}
