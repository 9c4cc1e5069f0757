//! Document storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage volume root. Client roots live under `<storage_root>/Clients`.
    #[serde(default = "default_storage_root")]
    pub storage_root: String,
    /// Sub-folders created inside every new client root.
    #[serde(default = "default_client_subfolders")]
    pub client_subfolders: Vec<String>,
    /// Base name of generated scan documents.
    #[serde(default = "default_scan_base_name")]
    pub scan_base_name: String,
    /// Maximum size of a single uploaded file in bytes (default 60 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Maximum number of images in one scan session.
    #[serde(default = "default_max_batch_files")]
    pub max_batch_files: usize,
    /// Whether scan sessions keep the original images unless told otherwise.
    #[serde(default = "default_keep_originals")]
    pub keep_originals_default: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            client_subfolders: default_client_subfolders(),
            scan_base_name: default_scan_base_name(),
            max_file_size_bytes: default_max_file_size(),
            max_batch_files: default_max_batch_files(),
            keep_originals_default: default_keep_originals(),
        }
    }
}

fn default_storage_root() -> String {
    "/storage".to_string()
}

fn default_client_subfolders() -> Vec<String> {
    [
        "Case Documents",
        "Pleadings",
        "Evidence",
        "Court Filings",
        "Correspondence",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_scan_base_name() -> String {
    "ScannedDocument.pdf".to_string()
}

fn default_max_file_size() -> u64 {
    62_914_560 // 60 MiB
}

fn default_max_batch_files() -> usize {
    50
}

fn default_keep_originals() -> bool {
    true
}
