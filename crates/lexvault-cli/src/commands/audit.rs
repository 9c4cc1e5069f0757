//! Audit log CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use lexvault_core::error::AppError;
use lexvault_service::RequestContext;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Show the most recent entries
    List {
        /// Number of results
        #[arg(short, long, default_value = "100")]
        limit: i64,
    },
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    /// Time
    time: String,
    /// Actor
    actor: String,
    /// Action
    action: String,
    /// Entity type
    entity: String,
    /// IP
    ip: String,
}

/// Execute audit commands
pub async fn execute(
    args: &AuditArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AuditCommand::List { limit } => {
            let entries = services.users.audit_logs(ctx, Some(*limit)).await?;
            match format {
                OutputFormat::Json => output::print_json(&entries, "[]"),
                OutputFormat::Table => {
                    let rows: Vec<AuditRow> = entries
                        .iter()
                        .map(|e| AuditRow {
                            time: output::format_time(Some(e.created_at)),
                            actor: e
                                .email
                                .clone()
                                .unwrap_or_else(|| e.user_id.to_string()),
                            action: e.action.clone(),
                            entity: e.entity_type.clone(),
                            ip: e.ip_address.clone().unwrap_or_default(),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}
