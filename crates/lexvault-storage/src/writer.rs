//! Atomic file writes inside client folders.
//!
//! Content goes to a hidden temporary file in the destination directory,
//! is synced, and only then renamed to its final name, so readers never see
//! a partially written document.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use lexvault_core::error::AppError;
use lexvault_core::result::AppResult;

const TEMP_PREFIX: &str = ".lexvault-";
const TEMP_SUFFIX: &str = ".partial";

/// Whether `name` is an in-flight temporary file of this module.
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

/// A fresh temporary path inside `dir`.
pub fn temp_path(dir: &Path) -> PathBuf {
    dir.join(format!("{TEMP_PREFIX}{}{TEMP_SUFFIX}", uuid::Uuid::new_v4()))
}

/// Create `dir` and its parents. Succeeds if it already exists.
pub async fn ensure_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::io_at("Failed to create directory", dir, e))
}

/// Like [`ensure_dir`], but reports whether this call created `dir`.
pub async fn ensure_dir_tracked(dir: &Path) -> AppResult<bool> {
    let existed = fs::try_exists(dir)
        .await
        .map_err(|e| AppError::io_at("Failed to inspect", dir, e))?;
    if !existed {
        ensure_dir(dir).await?;
    }
    Ok(!existed)
}

/// Best-effort removal of a directory this crate created, if still empty.
pub(crate) async fn discard_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir(dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!(path = %dir.display(), error = %e, "Left folder in place");
        }
    }
}

/// Write `data` to `path` and flush it to disk.
pub(crate) async fn write_synced(path: &Path, data: &[u8]) -> AppResult<()> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| AppError::io_at("Failed to create", path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| AppError::io_at("Failed to write", path, e))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::io_at("Failed to sync", path, e))
}

/// Write `data` as `dir/name`, refusing to replace an existing file.
///
/// The caller must hold the directory lock; the existence check and the
/// final rename are not atomic with respect to other processes.
pub async fn write_atomic(dir: &Path, name: &str, data: &[u8]) -> AppResult<PathBuf> {
    let target = dir.join(name);
    let temp = temp_path(dir);

    let result = async {
        write_synced(&temp, data).await?;
        if fs::try_exists(&target)
            .await
            .map_err(|e| AppError::io_at("Failed to inspect", &target, e))?
        {
            return Err(AppError::conflict(format!(
                "Refusing to overwrite existing file '{}'",
                target.display()
            )));
        }
        fs::rename(&temp, &target)
            .await
            .map_err(|e| AppError::io_at("Failed to finalize", &target, e))
    }
    .await;

    if let Err(e) = result {
        discard(&temp).await;
        return Err(e);
    }

    debug!(path = %target.display(), bytes = data.len(), "Wrote file");
    Ok(target)
}

/// Best-effort removal of a file this crate created.
pub(crate) async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove file");
        }
    }
}

#[cfg(test)]
mod tests {
    use lexvault_core::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_atomic(dir.path(), "Retainer.pdf", b"%PDF-1.5")
            .await
            .unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"%PDF-1.5");
        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, ["Retainer.pdf"]);
    }

    #[tokio::test]
    async fn test_write_atomic_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Retainer.pdf"), b"original")
            .await
            .unwrap();

        let err = write_atomic(dir.path(), "Retainer.pdf", b"replacement")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        assert_eq!(
            fs::read(dir.path().join("Retainer.pdf")).await.unwrap(),
            b"original"
        );
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Court Filings");
        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_temp_names_are_recognized() {
        let temp = temp_path(Path::new("/tmp"));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(is_temp_name(name));
        assert!(!is_temp_name("Retainer.pdf"));
    }
}
