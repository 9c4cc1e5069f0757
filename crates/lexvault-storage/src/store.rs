//! The document store: every filesystem operation on client folders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{info, warn};

use lexvault_core::config::StorageConfig;
use lexvault_core::error::AppError;
use lexvault_core::result::AppResult;
use lexvault_entity::document::{DownloadedFile, FileEntry, ScanReceipt, SearchHit};

use crate::listing;
use crate::locks::DirectoryLocks;
use crate::mime::content_type_for;
use crate::mover::{FileMover, OsFileMover, move_file};
use crate::naming::{next_name, split_name};
use crate::path::{resolve, resolve_folder, validate_segment};
use crate::scan::{ScanConverter, ScanImage};
use crate::writer::{discard, discard_dir, ensure_dir, ensure_dir_tracked, write_atomic};

/// Name of the directory under the storage root that holds client roots.
const CLIENTS_DIR: &str = "Clients";

/// Filesystem side of LexVault.
///
/// Name-then-write sequences (upload, scan, rename) hold a per-directory
/// lock, so concurrent requests in this process never pick the same name.
#[derive(Debug)]
pub struct DocumentStore {
    config: StorageConfig,
    locks: DirectoryLocks,
    mover: Arc<dyn FileMover>,
    converter: ScanConverter,
}

impl DocumentStore {
    /// Create a store over `config.storage_root`.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            locks: DirectoryLocks::new(),
            mover: Arc::new(OsFileMover),
            converter: ScanConverter::new(),
        }
    }

    /// Replace the rename primitive used by [`rename`](Self::rename).
    pub fn with_mover(mut self, mover: Arc<dyn FileMover>) -> Self {
        self.mover = mover;
        self
    }

    /// The storage configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Directory holding every client root.
    pub fn clients_dir(&self) -> PathBuf {
        Path::new(&self.config.storage_root).join(CLIENTS_DIR)
    }

    /// Provision `<storage_root>/Clients/<name>_<YYYYMMDDHHMMSS>` with the
    /// configured sub-folders.
    ///
    /// The tree is assembled in a hidden staging directory and renamed into
    /// place, so either the complete tree exists or nothing does.
    pub async fn create_client_tree(
        &self,
        client_name: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<PathBuf> {
        let name = validate_segment("client name", client_name.trim())?;
        for sub in &self.config.client_subfolders {
            validate_segment("client sub-folder", sub)?;
        }

        let clients = self.clients_dir();
        ensure_dir(&clients).await?;
        let root = clients.join(format!("{name}_{}", created_at.format("%Y%m%d%H%M%S")));

        let _guard = self.locks.lock(&clients).await;
        if fs::try_exists(&root)
            .await
            .map_err(|e| AppError::io_at("Failed to inspect", &root, e))?
        {
            return Err(AppError::conflict(format!(
                "Client folder '{}' already exists",
                root.display()
            )));
        }

        let staging = clients.join(format!(".staging-{}", uuid::Uuid::new_v4()));
        let built = async {
            fs::create_dir(&staging)
                .await
                .map_err(|e| AppError::io_at("Failed to create directory", &staging, e))?;
            for sub in &self.config.client_subfolders {
                let path = staging.join(sub);
                fs::create_dir(&path)
                    .await
                    .map_err(|e| AppError::io_at("Failed to create directory", &path, e))?;
            }
            fs::rename(&staging, &root)
                .await
                .map_err(|e| AppError::io_at("Failed to move client folder into", &root, e))
        }
        .await;

        if let Err(e) = built {
            if let Err(cleanup) = fs::remove_dir_all(&staging).await {
                warn!(path = %staging.display(), error = %cleanup, "Failed to remove staging folder");
            }
            return Err(e);
        }

        info!(root = %root.display(), "Provisioned client folder");
        Ok(root)
    }

    /// Remove a client tree created by [`create_client_tree`](Self::create_client_tree).
    ///
    /// Only used to undo a provisioning whose database insert failed.
    pub async fn remove_client_tree(&self, root: &Path) -> AppResult<()> {
        if !root.starts_with(self.clients_dir()) {
            return Err(AppError::invalid_input(format!(
                "Refusing to remove '{}' outside the clients directory",
                root.display()
            )));
        }
        fs::remove_dir_all(root)
            .await
            .map_err(|e| AppError::io_at("Failed to remove client folder", root, e))
    }

    /// Folders directly under the client root, sorted.
    pub async fn list_folders(&self, client_root: &Path) -> AppResult<Vec<String>> {
        listing::list_folders(client_root).await
    }

    /// Files in one client folder, sorted by name.
    pub async fn list_files(&self, client_root: &Path, folder: &str) -> AppResult<Vec<FileEntry>> {
        listing::list_files(&resolve_folder(client_root, folder)?).await
    }

    /// Case-insensitive substring search over every client folder.
    pub async fn search(&self, client_root: &Path, query: &str) -> AppResult<Vec<SearchHit>> {
        listing::search(client_root, query).await
    }

    fn check_size(&self, name: &str, len: usize) -> AppResult<()> {
        let limit = self.config.max_file_size_bytes;
        if len as u64 > limit {
            return Err(AppError::invalid_input(format!(
                "File '{name}' is {len} bytes; the limit is {limit} bytes"
            )));
        }
        Ok(())
    }

    /// Store `data` as `file_name` in `folder`, creating the folder if
    /// needed. Returns the versioned name actually used.
    ///
    /// A folder created by a call that then fails is removed again.
    pub async fn upload(
        &self,
        client_root: &Path,
        folder: &str,
        file_name: &str,
        data: &[u8],
    ) -> AppResult<String> {
        let dir = resolve_folder(client_root, folder)?;
        validate_segment("file name", file_name)?;
        self.check_size(file_name, data.len())?;

        let _guard = self.locks.lock(&dir).await;
        let created = ensure_dir_tracked(&dir).await?;
        let stored = async {
            let stored_as = next_name(&dir, file_name).await?;
            write_atomic(&dir, &stored_as, data).await?;
            Ok::<_, AppError>(stored_as)
        }
        .await;

        let stored_as = match stored {
            Ok(name) => name,
            Err(e) => {
                if created {
                    discard_dir(&dir).await;
                }
                return Err(e);
            }
        };

        info!(folder, name = %stored_as, bytes = data.len(), "Stored upload");
        Ok(stored_as)
    }

    /// Convert `images` into one PDF in `folder`, optionally keeping the
    /// originals next to it.
    ///
    /// `keep_originals` falls back to the configured default. All images
    /// are decoded before anything is written; if persisting any artifact
    /// fails, every artifact already written by this call is removed.
    pub async fn scan(
        &self,
        client_root: &Path,
        folder: &str,
        images: Vec<ScanImage>,
        keep_originals: Option<bool>,
    ) -> AppResult<ScanReceipt> {
        let dir = resolve_folder(client_root, folder)?;
        if images.is_empty() {
            return Err(AppError::invalid_input("No images uploaded"));
        }
        if images.len() > self.config.max_batch_files {
            return Err(AppError::invalid_input(format!(
                "{} images uploaded; at most {} are allowed per scan",
                images.len(),
                self.config.max_batch_files
            )));
        }
        for image in &images {
            validate_segment("file name", &image.name)?;
            self.check_size(&image.name, image.data.len())?;
        }

        let keep = keep_originals.unwrap_or(self.config.keep_originals_default);
        let originals: Vec<(String, Bytes)> = if keep {
            images
                .iter()
                .map(|image| (image.name.clone(), image.data.clone()))
                .collect()
        } else {
            Vec::new()
        };
        let page_count = images.len();
        let pdf = self.converter.convert(images).await?;

        let _guard = self.locks.lock(&dir).await;
        let created = ensure_dir_tracked(&dir).await?;

        let mut written: Vec<PathBuf> = Vec::new();
        let persisted = async {
            let pdf_name = next_name(&dir, &self.config.scan_base_name).await?;
            written.push(write_atomic(&dir, &pdf_name, &pdf).await?);

            let mut kept = Vec::with_capacity(originals.len());
            for (name, data) in &originals {
                let stored_as = next_name(&dir, name).await?;
                written.push(write_atomic(&dir, &stored_as, data).await?);
                kept.push(stored_as);
            }

            Ok::<_, AppError>(ScanReceipt {
                pdf: pdf_name,
                originals: kept,
            })
        }
        .await;

        match persisted {
            Ok(receipt) => {
                info!(
                    folder,
                    pdf = %receipt.pdf,
                    pages = page_count,
                    originals = receipt.originals.len(),
                    "Stored scanned document"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(folder, error = %e, removed = written.len(), "Rolling back scan batch");
                for path in &written {
                    discard(path).await;
                }
                if created {
                    discard_dir(&dir).await;
                }
                Err(e)
            }
        }
    }

    /// Rename `old_name` in `folder` to a versioned form of `desired_name`.
    ///
    /// When `desired_name` does not already end with the old file's
    /// extension (case-insensitively), the extension is appended.
    pub async fn rename(
        &self,
        client_root: &Path,
        folder: &str,
        old_name: &str,
        desired_name: &str,
    ) -> AppResult<String> {
        let dir = resolve_folder(client_root, folder)?;
        let source = dir.join(validate_segment("file name", old_name)?);
        validate_segment("new name", desired_name)?;
        let desired = with_extension_of(old_name, desired_name);
        validate_segment("new name", &desired)?;

        let _guard = self.locks.lock(&dir).await;
        match fs::metadata(&source).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(AppError::not_found(format!(
                    "Source file '{old_name}' not found in '{folder}'"
                )));
            }
            Err(e) => return Err(AppError::io_at("Failed to read source file", &source, e)),
        }

        let final_name = next_name(&dir, &desired).await?;
        move_file(self.mover.as_ref(), &source, &dir.join(&final_name)).await?;

        info!(folder, from = old_name, to = %final_name, "Renamed file");
        Ok(final_name)
    }

    /// Read a file back from a client folder.
    pub async fn read(
        &self,
        client_root: &Path,
        folder: &str,
        file_name: &str,
    ) -> AppResult<DownloadedFile> {
        let path = resolve(client_root, folder, Some(file_name))?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| AppError::io_at("Failed to read", &path, e))?;
        if !meta.is_file() {
            return Err(AppError::not_found(format!(
                "File '{file_name}' not found in '{folder}'"
            )));
        }

        let data = fs::read(&path)
            .await
            .map_err(|e| AppError::io_at("Failed to read", &path, e))?;
        Ok(DownloadedFile {
            name: file_name.to_string(),
            content_type: content_type_for(file_name).to_string(),
            bytes: Bytes::from(data),
        })
    }
}

/// `desired` with `old`'s extension appended unless it already ends with it.
fn with_extension_of(old: &str, desired: &str) -> String {
    let (_, ext) = split_name(old);
    if ext.is_empty() || desired.to_lowercase().ends_with(&ext.to_lowercase()) {
        desired.to_string()
    } else {
        format!("{desired}{ext}")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use lexvault_core::ErrorKind;

    use super::*;

    fn store(root: &Path) -> DocumentStore {
        DocumentStore::new(StorageConfig {
            storage_root: root.to_string_lossy().into_owned(),
            max_file_size_bytes: 1024 * 1024,
            max_batch_files: 3,
            ..StorageConfig::default()
        })
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 0, 0])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    async fn names(store: &DocumentStore, root: &Path, folder: &str) -> Vec<String> {
        store
            .list_files(root, folder)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect()
    }

    #[derive(Debug)]
    struct CrossDeviceMover;

    #[async_trait]
    impl FileMover for CrossDeviceMover {
        async fn rename(&self, _from: &Path, _to: &Path) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::CrossesDevices))
        }
    }

    #[test]
    fn test_with_extension_of() {
        assert_eq!(with_extension_of("scan.pdf", "Motion"), "Motion.pdf");
        assert_eq!(with_extension_of("scan.pdf", "Motion.PDF"), "Motion.PDF");
        assert_eq!(with_extension_of("photo.jpeg", "exhibit.png"), "exhibit.png.jpeg");
        assert_eq!(with_extension_of("README", "notes"), "notes");
    }

    #[tokio::test]
    async fn test_create_client_tree() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let created = DateTime::parse_from_rfc3339("2024-03-05T09:08:07Z")
            .unwrap()
            .with_timezone(&Utc);

        let root = store.create_client_tree("Acme Corp", created).await.unwrap();
        assert_eq!(root, dir.path().join("Clients/Acme Corp_20240305090807"));
        assert_eq!(
            store.list_folders(&root).await.unwrap(),
            [
                "Case Documents",
                "Correspondence",
                "Court Filings",
                "Evidence",
                "Pleadings"
            ]
        );

        let err = store.create_client_tree("Acme Corp", created).await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));

        let err = store.create_client_tree("../escape", created).await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));

        store.remove_client_tree(&root).await.unwrap();
        assert!(!root.exists());
        assert!(store.remove_client_tree(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_versions_and_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let first = store.upload(dir.path(), "Misc", "Brief.docx", b"1").await.unwrap();
        let second = store.upload(dir.path(), "Misc", "Brief.docx", b"2").await.unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("Brief.docx", "Brief_v2.docx"));

        let file = store.read(dir.path(), "Misc", "Brief_v2.docx").await.unwrap();
        assert_eq!(&file.bytes[..], b"2");
        assert_eq!(
            file.content_type,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store(dir.path()));

        let mut handles = Vec::new();
        for i in 0..8u8 {
            let store = store.clone();
            let root = dir.path().to_path_buf();
            handles.push(tokio::spawn(async move {
                store.upload(&root, "Evidence", "photo.jpg", &[i]).await.unwrap()
            }));
        }
        let mut stored = Vec::new();
        for handle in handles {
            stored.push(handle.await.unwrap());
        }
        stored.sort();
        stored.dedup();
        assert_eq!(stored.len(), 8);
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_and_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let big = vec![0u8; 1024 * 1024 + 1];
        let err = store.upload(dir.path(), "Evidence", "big.bin", &big).await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));

        let err = store
            .upload(dir.path(), "..", "passwd", b"x")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
        assert!(store.list_folders(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_removes_folder_it_created() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let too_long = format!("{}.pdf", "x".repeat(300));

        let err = store
            .upload(dir.path(), "Pleadings", &too_long, b"%PDF")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Io));
        assert!(!dir.path().join("Pleadings").exists());

        fs::create_dir(dir.path().join("Evidence")).await.unwrap();
        store
            .upload(dir.path(), "Evidence", &too_long, b"%PDF")
            .await
            .unwrap_err();
        assert!(dir.path().join("Evidence").is_dir());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        fs::create_dir(dir.path().join("Evidence")).await.unwrap();

        let err = store.read(dir.path(), "Evidence", "nope.pdf").await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        let err = store.read(dir.path(), "Evidence", "..").await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_scan_writes_pdf_and_versioned_originals() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        fs::create_dir(dir.path().join("Evidence")).await.unwrap();
        fs::write(dir.path().join("Evidence/ScannedDocument.pdf"), b"old")
            .await
            .unwrap();

        let receipt = store
            .scan(
                dir.path(),
                "Evidence",
                vec![
                    ScanImage::new("page.png", png(8, 8)),
                    ScanImage::new("page.png", png(4, 9)),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(receipt.pdf, "ScannedDocument_v2.pdf");
        assert_eq!(receipt.originals, ["page.png", "page_v2.png"]);
        assert_eq!(
            names(&store, dir.path(), "Evidence").await,
            ["ScannedDocument.pdf", "ScannedDocument_v2.pdf", "page.png", "page_v2.png"]
        );
    }

    #[tokio::test]
    async fn test_scan_without_originals() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let receipt = store
            .scan(dir.path(), "Pleadings", vec![ScanImage::new("a.png", png(2, 2))], Some(false))
            .await
            .unwrap();
        assert_eq!(receipt.pdf, "ScannedDocument.pdf");
        assert!(receipt.originals.is_empty());
        assert_eq!(names(&store, dir.path(), "Pleadings").await, ["ScannedDocument.pdf"]);
    }

    #[tokio::test]
    async fn test_scan_decode_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let err = store
            .scan(
                dir.path(),
                "Evidence",
                vec![
                    ScanImage::new("good.png", png(3, 3)),
                    ScanImage::new("broken.jpg", b"\xff\xd8 truncated".to_vec()),
                ],
                Some(true),
            )
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::InvalidInput));
        assert!(err.message.contains("broken.jpg"));
        assert!(!dir.path().join("Evidence").exists());
    }

    #[tokio::test]
    async fn test_scan_rolls_back_when_an_original_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let unwritable = format!("{}.png", "x".repeat(300));

        let err = store
            .scan(
                dir.path(),
                "Evidence",
                vec![ScanImage::new(unwritable, png(3, 3))],
                Some(true),
            )
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::Io));
        assert!(names(&store, dir.path(), "Evidence").await.is_empty());
        assert!(!dir.path().join("Evidence").exists());
    }

    #[tokio::test]
    async fn test_scan_batch_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let images = (0..4)
            .map(|i| ScanImage::new(format!("p{i}.png"), png(1, 1)))
            .collect();

        let err = store.scan(dir.path(), "Evidence", images, None).await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_rename_appends_extension_and_versions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.upload(dir.path(), "Pleadings", "Motion.pdf", b"m").await.unwrap();
        store.upload(dir.path(), "Pleadings", "scan.pdf", b"s").await.unwrap();

        let final_name = store
            .rename(dir.path(), "Pleadings", "scan.pdf", "Motion")
            .await
            .unwrap();
        assert_eq!(final_name, "Motion_v2.pdf");
        assert_eq!(
            names(&store, dir.path(), "Pleadings").await,
            ["Motion.pdf", "Motion_v2.pdf"]
        );
    }

    #[tokio::test]
    async fn test_rename_across_devices_copies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).with_mover(Arc::new(CrossDeviceMover));
        store.upload(dir.path(), "Evidence", "report.pdf", b"r1").await.unwrap();
        store.upload(dir.path(), "Evidence", "report_v2.pdf", b"r2").await.unwrap();
        store.upload(dir.path(), "Evidence", "draft.pdf", b"d").await.unwrap();

        let final_name = store
            .rename(dir.path(), "Evidence", "draft.pdf", "report.pdf")
            .await
            .unwrap();
        assert_eq!(final_name, "report_v3.pdf");
        assert!(!dir.path().join("Evidence/draft.pdf").exists());
        assert_eq!(
            fs::read(dir.path().join("Evidence/report_v3.pdf")).await.unwrap(),
            b"d"
        );
    }

    #[tokio::test]
    async fn test_rename_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        fs::create_dir(dir.path().join("Evidence")).await.unwrap();

        let err = store
            .rename(dir.path(), "Evidence", "ghost.pdf", "real")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }
}
