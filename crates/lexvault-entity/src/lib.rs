//! # lexvault-entity
//!
//! Domain entity models for LexVault. Structs here are either database rows
//! (deriving `sqlx::FromRow`) or value objects that cross the service
//! boundary (file listings, search hits, operation receipts).

pub mod audit;
pub mod client;
pub mod document;
pub mod user;
