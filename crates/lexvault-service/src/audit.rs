//! Best-effort audit recording.

use lexvault_core::events::AuditEvent;
use lexvault_core::traits::AuditSink;
use tracing::warn;

/// Hand `event` to `sink`. A failing sink is logged and otherwise ignored:
/// the audited operation has already happened.
pub async fn record(sink: &dyn AuditSink, event: AuditEvent) {
    let action = event.action;
    let actor = event.actor;
    if let Err(e) = sink.record(event).await {
        warn!(%action, %actor, error = %e, "Failed to record audit event");
    }
}
