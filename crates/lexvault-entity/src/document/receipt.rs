//! Results of document mutations.

use serde::{Deserialize, Serialize};

/// `{ storedAs }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// The name the file was stored under after versioning.
    pub stored_as: String,
}

/// `{ pdf, originals }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReceipt {
    /// Final name of the generated PDF.
    pub pdf: String,
    /// Final names of the kept original images, in input order.
    pub originals: Vec<String>,
}

/// `{ finalName }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReceipt {
    /// The name the file ended up with.
    pub final_name: String,
}

/// A file read back from a client folder.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// File name.
    pub name: String,
    /// Guessed MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: bytes::Bytes,
}
