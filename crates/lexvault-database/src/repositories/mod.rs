//! Repository implementations for LexVault entities.

pub mod audit;
pub mod client;
pub mod user;

pub use audit::AuditLogRepository;
pub use client::ClientRepository;
pub use user::UserRepository;

/// Whether a sqlx error is a unique-constraint violation (`23505`).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
