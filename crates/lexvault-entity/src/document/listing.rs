//! Directory listing and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A regular file directly inside a client folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name, including any `_vN` suffix.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}

/// A file matched by a cross-folder search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// File name.
    pub name: String,
    /// Folder (directly under the client root) containing the file.
    pub folder: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,
}

/// `{ folders: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderListing {
    /// Folder names, sorted.
    pub folders: Vec<String>,
}

/// `{ files: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileListing {
    /// Files, sorted by name.
    pub files: Vec<FileEntry>,
}

/// `{ results: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Hits, sorted by folder then name.
    pub results: Vec<SearchHit>,
}
