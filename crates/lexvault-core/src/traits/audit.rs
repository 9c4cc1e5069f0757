//! Audit trail sink.

use async_trait::async_trait;

use crate::events::AuditEvent;
use crate::result::AppResult;

/// Destination for audit events.
///
/// Callers treat failures as non-fatal: the audited operation has already
/// happened, so an error here is logged and otherwise ignored.
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    /// Persist one event.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}
