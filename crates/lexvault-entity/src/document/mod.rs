//! Document value objects: directory metadata and operation receipts.
//!
//! Field names of these types are the stable boundary contract.

pub mod listing;
pub mod receipt;

pub use listing::{FileEntry, FileListing, FolderListing, SearchHit, SearchResults};
pub use receipt::{DownloadedFile, RenameReceipt, ScanReceipt, UploadReceipt};
