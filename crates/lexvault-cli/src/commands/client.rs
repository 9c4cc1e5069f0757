//! Client management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use lexvault_core::error::AppError;
use lexvault_core::types::ClientId;
use lexvault_service::RequestContext;
use lexvault_service::client::CreateClientRequest;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for client commands
#[derive(Debug, Args)]
pub struct ClientArgs {
    /// Client subcommand
    #[command(subcommand)]
    pub command: ClientCommand,
}

/// Client subcommands
#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Create a client and its folder tree
    Create {
        /// Client name
        name: String,
        /// Primary contact
        #[arg(long)]
        contact_person: Option<String>,
        /// Contact e-mail
        #[arg(long)]
        contact_email: Option<String>,
        /// Contact phone
        #[arg(long)]
        contact_phone: Option<String>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List clients, newest first
    List,
    /// Show one client
    Show {
        /// Client ID
        id: ClientId,
    },
}

/// Client display row
#[derive(Debug, Serialize, Tabled)]
struct ClientRow {
    /// Client ID
    id: String,
    /// Name
    name: String,
    /// Contact
    contact: String,
    /// Folder
    folder: String,
    /// Created at
    created_at: String,
}

/// Execute client commands
pub async fn execute(
    args: &ClientArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ClientCommand::Create {
            name,
            contact_person,
            contact_email,
            contact_phone,
            notes,
        } => {
            let client = services
                .clients
                .create_client(
                    ctx,
                    CreateClientRequest {
                        name: name.clone(),
                        contact_person: contact_person.clone(),
                        contact_email: contact_email.clone(),
                        contact_phone: contact_phone.clone(),
                        notes: notes.clone(),
                    },
                )
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&client, "{}"),
                OutputFormat::Table => {
                    output::print_success(&format!("Client '{}' created", client.name));
                    output::print_kv("ID", &client.id.to_string());
                    output::print_kv("Folder", &client.folder_path);
                }
            }
        }
        ClientCommand::List => {
            let clients = services.clients.list_clients(ctx).await?;
            match format {
                OutputFormat::Json => output::print_json(&clients, "[]"),
                OutputFormat::Table => {
                    let rows: Vec<ClientRow> = clients
                        .iter()
                        .map(|c| ClientRow {
                            id: c.id.to_string(),
                            name: c.name.clone(),
                            contact: c.contact_person.clone().unwrap_or_default(),
                            folder: c.folder_path.clone(),
                            created_at: output::format_time(Some(c.created_at)),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        ClientCommand::Show { id } => {
            let client = services.clients.get_client(ctx, *id).await?;
            match format {
                OutputFormat::Json => output::print_json(&client, "{}"),
                OutputFormat::Table => {
                    let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
                    output::print_kv("ID", &client.id.to_string());
                    output::print_kv("Name", &client.name);
                    output::print_kv("Contact", &optional(&client.contact_person));
                    output::print_kv("Email", &optional(&client.contact_email));
                    output::print_kv("Phone", &optional(&client.contact_phone));
                    output::print_kv("Folder", &client.folder_path);
                    output::print_kv("Notes", &optional(&client.notes));
                    output::print_kv("Created", &output::format_time(Some(client.created_at)));
                }
            }
        }
    }

    Ok(())
}
