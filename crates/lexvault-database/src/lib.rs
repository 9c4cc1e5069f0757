//! # lexvault-database
//!
//! PostgreSQL connection management and the repositories for users,
//! clients, and the audit trail. The schema itself is provisioned outside
//! this workspace.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
