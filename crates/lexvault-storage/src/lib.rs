//! # lexvault-storage
//!
//! The document storage layer. Maps `(client root, folder, file)` onto the
//! filesystem, assigns `name_vN.ext` versions on collision, lists and
//! searches client folders, and turns batches of scanned images into
//! multi-page PDFs.
//!
//! [`DocumentStore`] is the entry point; the other modules are the pieces
//! it composes and are public so they can be tested and reused directly.

pub mod listing;
pub mod locks;
pub mod mime;
pub mod mover;
pub mod naming;
pub mod path;
pub mod scan;
pub mod store;
pub mod writer;

pub use mover::{FileMover, OsFileMover};
pub use scan::{ScanConverter, ScanImage};
pub use store::DocumentStore;
