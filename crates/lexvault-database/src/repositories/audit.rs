//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use lexvault_core::error::{AppError, ErrorKind};
use lexvault_core::events::AuditEvent;
use lexvault_core::result::AppResult;
use lexvault_core::traits::AuditSink;
use lexvault_core::types::AuditLogId;
use lexvault_entity::audit::{AuditLogEntry, AuditLogRecord, CreateAuditLogEntry};

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an audit entry.
    pub async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_logs \
               (id, user_id, action, entity_type, entity_id, details, ip_address, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(AuditLogId::new())
        .bind(data.user_id)
        .bind(&data.action)
        .bind(&data.entity_type)
        .bind(data.entity_id)
        .bind(&data.details)
        .bind(&data.ip_address)
        .bind(data.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e))
    }

    /// The most recent entries joined with the acting user, newest first.
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<AuditLogRecord>> {
        sqlx::query_as::<_, AuditLogRecord>(
            "SELECT al.*, u.email, u.full_name \
             FROM audit_logs al \
             LEFT JOIN users u ON al.user_id = u.id \
             ORDER BY al.created_at DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e))
    }
}

#[async_trait]
impl AuditSink for AuditLogRepository {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.create(&CreateAuditLogEntry::from(event)).await.map(|_| ())
    }
}
