//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use lexvault_core::error::AppError;
use lexvault_core::types::UserId;
use lexvault_entity::user::{UserProfile, UserRole};
use lexvault_service::RequestContext;
use lexvault_service::user::CreateUserRequest;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Create a user
    Create {
        /// Email
        #[arg(short, long)]
        email: String,
        /// Full name
        #[arg(short = 'n', long)]
        full_name: String,
        /// Role: admin, manager or user
        #[arg(short, long, default_value = "user")]
        role: String,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Change a user's role
    Role {
        /// User ID
        id: UserId,
        /// New role: admin, manager or user
        role: UserRole,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: UserId,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Full name
    full_name: String,
    /// Role
    role: String,
}

impl From<&UserProfile> for UserRow {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::List => {
            let users = services.users.list_users(ctx).await?;
            match format {
                OutputFormat::Json => output::print_json(&users, "[]"),
                OutputFormat::Table => {
                    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        UserCommand::Create {
            email,
            full_name,
            role,
            password,
        } => {
            let password = super::password_or_prompt(password, "Password", true)?;
            let user = services
                .users
                .create_user(
                    ctx,
                    CreateUserRequest {
                        email: email.clone(),
                        password,
                        full_name: full_name.clone(),
                        role: role.clone(),
                    },
                )
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&user, "{}"),
                OutputFormat::Table => output::print_success(&format!(
                    "User '{}' created (id: {})",
                    user.email, user.id
                )),
            }
        }
        UserCommand::Role { id, role } => {
            let user = services.users.update_role(ctx, *id, *role).await?;
            output::print_success(&format!("User '{}' is now {}", user.email, user.role));
        }
        UserCommand::Delete { id } => {
            services.users.delete_user(ctx, *id).await?;
            output::print_success(&format!("User {id} deleted"));
        }
    }

    Ok(())
}
