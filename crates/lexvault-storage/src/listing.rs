//! Folder listing and cross-folder search over a client root.
//!
//! All functions read metadata only. A missing root or folder yields an
//! empty result; any other read failure aborts with an `Io` error naming
//! the path, never a partial result.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::fs;

use lexvault_core::error::{AppError, ErrorKind};
use lexvault_core::result::AppResult;
use lexvault_entity::document::{FileEntry, SearchHit};

use crate::writer::is_temp_name;

/// A directory entry with the metadata the listings need.
struct RawEntry {
    name: String,
    is_dir: bool,
    is_file: bool,
    size: u64,
    modified: Option<DateTime<Utc>>,
}

fn read_failure(path: &Path, err: std::io::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Io,
        format!("Failed to read '{}': {err}", path.display()),
        err,
    )
}

/// Read every entry of `dir`. `Ok(None)` when the directory is absent.
async fn read_entries(dir: &Path) -> AppResult<Option<Vec<RawEntry>>> {
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(read_failure(dir, e)),
    };

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| read_failure(dir, e))?
    {
        let path = entry.path();
        let meta = entry
            .metadata()
            .await
            .map_err(|e| read_failure(&path, e))?;

        entries.push(RawEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        });
    }
    Ok(Some(entries))
}

/// Names of the folders directly under `client_root`, sorted.
pub async fn list_folders(client_root: &Path) -> AppResult<Vec<String>> {
    let mut folders: Vec<String> = read_entries(client_root)
        .await?
        .unwrap_or_default()
        .into_iter()
        .filter(|e| e.is_dir)
        .map(|e| e.name)
        .collect();
    folders.sort();
    Ok(folders)
}

/// Regular files directly inside `dir`, sorted by name.
pub async fn list_files(dir: &Path) -> AppResult<Vec<FileEntry>> {
    let mut files: Vec<FileEntry> = read_entries(dir)
        .await?
        .unwrap_or_default()
        .into_iter()
        .filter(|e| e.is_file && !is_temp_name(&e.name))
        .map(|e| FileEntry {
            name: e.name,
            size: e.size,
            modified: e.modified,
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Files in any immediate sub-folder of `client_root` whose name contains
/// `query`, case-insensitively. An empty query matches every file.
///
/// Results are sorted by folder, then name.
pub async fn search(client_root: &Path, query: &str) -> AppResult<Vec<SearchHit>> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();

    for folder in list_folders(client_root).await? {
        for file in list_files(&client_root.join(&folder)).await? {
            if file.name.to_lowercase().contains(&needle) {
                hits.push(SearchHit {
                    name: file.name,
                    folder: folder.clone(),
                    size: file.size,
                    modified: file.modified,
                });
            }
        }
    }

    hits.sort_by(|a, b| a.folder.cmp(&b.folder).then_with(|| a.name.cmp(&b.name)));
    Ok(hits)
}
