//! Domain events emitted by LexVault operations.
//!
//! Every security-relevant mutation produces an [`AuditEvent`] that is
//! handed to an [`AuditSink`](crate::traits::AuditSink).

pub mod audit;

pub use audit::{AuditAction, AuditEvent};
