//! # lexvault-core
//!
//! Core crate for LexVault. Contains configuration schemas, typed
//! identifiers, audit events, the collaborator traits the storage core
//! depends on, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LexVault crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
