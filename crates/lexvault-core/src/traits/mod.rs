//! Collaborator traits defined in `lexvault-core` and implemented by other
//! crates (the database repositories in production, fakes in tests).

pub mod audit;
pub mod directory;

pub use audit::AuditSink;
pub use directory::ClientDirectory;
