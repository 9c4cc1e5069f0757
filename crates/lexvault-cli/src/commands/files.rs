//! Document commands against a client's folder tree.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use lexvault_core::error::AppError;
use lexvault_core::types::ClientId;
use lexvault_service::RequestContext;
use lexvault_storage::ScanImage;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FilesArgs {
    /// Client whose folders to work in
    #[arg(long, global = true)]
    pub client: Option<ClientId>,

    /// Files subcommand
    #[command(subcommand)]
    pub command: FilesCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List the client's folders
    Folders,
    /// List files in one folder
    List {
        /// Folder name
        #[arg(long)]
        folder: String,
    },
    /// Search file names across all folders
    Search {
        /// Case-insensitive substring
        query: String,
    },
    /// Upload local files; names are versioned on collision
    Upload {
        /// Destination folder
        #[arg(long)]
        folder: String,
        /// Store under this name instead of the local file name
        #[arg(long)]
        name: Option<String>,
        /// Local files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Combine page images into one PDF
    Scan {
        /// Destination folder
        #[arg(long)]
        folder: String,
        /// Keep the original images next to the PDF
        #[arg(long, conflicts_with = "discard_originals")]
        keep_originals: bool,
        /// Do not keep the original images
        #[arg(long)]
        discard_originals: bool,
        /// Page images, in page order
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Rename a file; the old extension is kept
    Rename {
        /// Folder name
        #[arg(long)]
        folder: String,
        /// Current file name
        old_name: String,
        /// Desired file name
        new_name: String,
    },
    /// Download a file
    Download {
        /// Folder name
        #[arg(long)]
        folder: String,
        /// File name
        name: String,
        /// Where to write it (defaults to the file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// Folder
    folder: String,
    /// Name
    name: String,
    /// Size in bytes
    size: u64,
    /// Last modified
    modified: String,
}

/// Local file name of `path`, as UTF-8.
fn local_name(path: &Path) -> Result<String, AppError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::invalid_input(format!("'{}' has no usable file name", path.display()))
        })
}

async fn read_local(path: &Path) -> Result<Vec<u8>, AppError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| AppError::io_at("Failed to read", path, e))
}

/// Execute file commands
pub async fn execute(
    args: &FilesArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client_id = args
        .client
        .ok_or_else(|| AppError::invalid_input("--client is required"))?;
    let documents = &services.documents;

    match &args.command {
        FilesCommand::Folders => {
            let listing = documents.list_folders(ctx, client_id).await?;
            match format {
                OutputFormat::Json => output::print_json(&listing, "{}"),
                OutputFormat::Table => {
                    for folder in &listing.folders {
                        println!("{folder}");
                    }
                }
            }
        }
        FilesCommand::List { folder } => {
            let listing = documents.list_files(ctx, client_id, folder).await?;
            match format {
                OutputFormat::Json => output::print_json(&listing, "{}"),
                OutputFormat::Table => {
                    let rows: Vec<FileRow> = listing
                        .files
                        .into_iter()
                        .map(|f| FileRow {
                            folder: folder.clone(),
                            name: f.name,
                            size: f.size,
                            modified: output::format_time(f.modified),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        FilesCommand::Search { query } => {
            let found = documents.search(ctx, client_id, query).await?;
            match format {
                OutputFormat::Json => output::print_json(&found, "{}"),
                OutputFormat::Table => {
                    let rows: Vec<FileRow> = found
                        .results
                        .into_iter()
                        .map(|h| FileRow {
                            folder: h.folder,
                            name: h.name,
                            size: h.size,
                            modified: output::format_time(h.modified),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        FilesCommand::Upload { folder, name, paths } => {
            if name.is_some() && paths.len() > 1 {
                return Err(AppError::invalid_input(
                    "--name can only be used with a single file",
                ));
            }
            let mut receipts = Vec::with_capacity(paths.len());
            for path in paths {
                let file_name = match name {
                    Some(n) => n.clone(),
                    None => local_name(path)?,
                };
                let data = read_local(path).await?;
                let receipt = documents
                    .upload(ctx, client_id, folder, &file_name, &data)
                    .await?;
                if format == OutputFormat::Table {
                    output::print_success(&format!("Stored as '{}'", receipt.stored_as));
                }
                receipts.push(receipt);
            }
            if format == OutputFormat::Json {
                output::print_json(&receipts, "[]");
            }
        }
        FilesCommand::Scan {
            folder,
            keep_originals,
            discard_originals,
            images,
        } => {
            let mut pages = Vec::with_capacity(images.len());
            for path in images {
                pages.push(ScanImage::new(local_name(path)?, read_local(path).await?));
            }
            let keep = match (*keep_originals, *discard_originals) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            let receipt = documents.scan(ctx, client_id, folder, pages, keep).await?;
            match format {
                OutputFormat::Json => output::print_json(&receipt, "{}"),
                OutputFormat::Table => {
                    output::print_success(&format!("Created '{}'", receipt.pdf));
                    for original in &receipt.originals {
                        output::print_kv("Original", original);
                    }
                }
            }
        }
        FilesCommand::Rename {
            folder,
            old_name,
            new_name,
        } => {
            let receipt = documents
                .rename(ctx, client_id, folder, old_name, new_name)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&receipt, "{}"),
                OutputFormat::Table => {
                    output::print_success(&format!("Renamed to '{}'", receipt.final_name))
                }
            }
        }
        FilesCommand::Download {
            folder,
            name,
            output: target,
        } => {
            let file = documents.download(ctx, client_id, folder, name).await?;
            let target = target.clone().unwrap_or_else(|| PathBuf::from(&file.name));
            tokio::fs::write(&target, &file.bytes)
                .await
                .map_err(|e| AppError::io_at("Failed to write", &target, e))?;
            output::print_success(&format!(
                "Wrote {} bytes ({}) to {}",
                file.bytes.len(),
                file.content_type,
                target.display()
            ));
        }
    }

    Ok(())
}
