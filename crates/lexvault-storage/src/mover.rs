//! Moving files within the storage volume.
//!
//! Renames are attempted first. When source and destination live on
//! different devices the move degrades to copy-then-delete.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use lexvault_core::error::AppError;
use lexvault_core::result::AppResult;

use crate::writer::{discard, temp_path};

/// The rename primitive used for moves.
#[async_trait]
pub trait FileMover: Send + Sync + std::fmt::Debug + 'static {
    /// Rename `from` to `to`.
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Renames through the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileMover;

#[async_trait]
impl FileMover for OsFileMover {
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to).await
    }
}

/// Move `from` to `to` with `mover`, copying across devices if needed.
///
/// The copy lands in a temporary file next to `to` and is renamed into
/// place before the source is removed.
pub async fn move_file(mover: &dyn FileMover, from: &Path, to: &Path) -> AppResult<()> {
    match mover.rename(from, to).await {
        Ok(()) => {
            debug!(from = %from.display(), to = %to.display(), "Renamed file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            info!(
                from = %from.display(),
                to = %to.display(),
                "Cross-device rename, falling back to copy"
            );
            copy_then_delete(from, to).await
        }
        Err(e) => Err(AppError::io_at("Failed to rename", from, e)),
    }
}

async fn copy_then_delete(from: &Path, to: &Path) -> AppResult<()> {
    let dir = to.parent().unwrap_or_else(|| Path::new("."));
    let temp = temp_path(dir);

    let copied = async {
        let bytes = fs::copy(from, &temp)
            .await
            .map_err(|e| AppError::io_at("Failed to copy", from, e))?;
        fs::File::open(&temp)
            .await
            .map_err(|e| AppError::io_at("Failed to open", &temp, e))?
            .sync_all()
            .await
            .map_err(|e| AppError::io_at("Failed to sync", &temp, e))?;
        fs::rename(&temp, to)
            .await
            .map_err(|e| AppError::io_at("Failed to finalize", to, e))?;
        Ok::<u64, AppError>(bytes)
    }
    .await;

    let bytes = match copied {
        Ok(bytes) => bytes,
        Err(e) => {
            discard(&temp).await;
            return Err(e);
        }
    };

    fs::remove_file(from)
        .await
        .map_err(|e| AppError::io_at("Failed to remove source after copy", from, e))?;
    debug!(from = %from.display(), to = %to.display(), bytes, "Copied file across devices");
    Ok(())
}
