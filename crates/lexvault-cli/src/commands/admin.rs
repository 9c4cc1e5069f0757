//! Administrator bootstrap commands.

use clap::{Args, Subcommand};

use lexvault_core::error::AppError;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an administrator directly against the database
    Create {
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::Create {
            email,
            full_name,
            password,
        } => {
            let email = super::text_or_prompt(email, "Admin email")?;
            let full_name = super::text_or_prompt(full_name, "Full name")?;
            let password = super::password_or_prompt(password, "Admin password", true)?;

            let profile = services
                .users
                .bootstrap_admin(&email, &password, &full_name)
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&profile, "{}"),
                OutputFormat::Table => output::print_success(&format!(
                    "Administrator '{}' created (id: {})",
                    profile.email, profile.id
                )),
            }
        }
    }

    Ok(())
}
