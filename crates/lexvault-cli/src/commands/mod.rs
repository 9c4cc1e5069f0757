//! CLI command definitions and dispatch.

pub mod admin;
pub mod audit;
pub mod client;
pub mod files;
pub mod login;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use lexvault_auth::jwt::{JwtDecoder, JwtEncoder};
use lexvault_auth::password::{PasswordHasher, PasswordValidator};
use lexvault_auth::rbac::RbacEnforcer;
use lexvault_core::config::AppConfig;
use lexvault_core::error::AppError;
use lexvault_core::traits::{AuditSink, ClientDirectory};
use lexvault_database::DatabasePool;
use lexvault_database::repositories::{AuditLogRepository, ClientRepository, UserRepository};
use lexvault_service::{
    AdminUserService, AuthService, ClientService, DocumentService, RequestContext,
};
use lexvault_storage::DocumentStore;

use crate::output::OutputFormat;

/// LexVault: client folders, versioned uploads, and scan-to-PDF for law firms
#[derive(Debug, Parser)]
#[command(name = "lexvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Bearer token from `lexvault login`
    #[arg(long, env = "LEXVAULT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and print a token
    Login(login::LoginArgs),
    /// Bootstrap administrator accounts
    Admin(admin::AdminArgs),
    /// User management
    User(user::UserArgs),
    /// Client management
    Client(client::ClientArgs),
    /// Documents inside client folders
    Files(files::FilesArgs),
    /// Audit log
    Audit(audit::AuditArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let services = Services::connect(config).await?;
        let result = match &self.command {
            Commands::Login(args) => login::execute(args, &services, self.format).await,
            Commands::Admin(args) => admin::execute(args, &services, self.format).await,
            Commands::User(args) => {
                let ctx = services.authenticate(self.token.as_deref()).await?;
                user::execute(args, &services, &ctx, self.format).await
            }
            Commands::Client(args) => {
                let ctx = services.authenticate(self.token.as_deref()).await?;
                client::execute(args, &services, &ctx, self.format).await
            }
            Commands::Files(args) => {
                let ctx = services.authenticate(self.token.as_deref()).await?;
                files::execute(args, &services, &ctx, self.format).await
            }
            Commands::Audit(args) => {
                let ctx = services.authenticate(self.token.as_deref()).await?;
                audit::execute(args, &services, &ctx, self.format).await
            }
        };
        services.pool.close().await;
        result
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Every service the commands need, wired over one pool.
pub struct Services {
    pool: DatabasePool,
    pub auth: AuthService,
    pub users: AdminUserService,
    pub clients: ClientService,
    pub documents: DocumentService,
}

impl Services {
    /// Connect to the database and build the service graph.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = DatabasePool::connect(&config.database).await?;

        let user_repo = Arc::new(UserRepository::new(pool.pool().clone()));
        let client_repo = Arc::new(ClientRepository::new(pool.pool().clone()));
        let audit_repo = Arc::new(AuditLogRepository::new(pool.pool().clone()));
        let audit_sink: Arc<dyn AuditSink> = audit_repo.clone();
        let directory: Arc<dyn ClientDirectory> = client_repo.clone();

        let hasher = Arc::new(PasswordHasher::new());
        let rbac = Arc::new(RbacEnforcer::new());
        let store = Arc::new(DocumentStore::new(config.storage.clone()));

        let auth = AuthService::new(
            user_repo.clone(),
            hasher.clone(),
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::new(JwtDecoder::new(&config.auth)),
            audit_sink.clone(),
        );
        let users = AdminUserService::new(
            user_repo,
            audit_repo,
            hasher,
            Arc::new(PasswordValidator::new(&config.auth)),
            rbac.clone(),
            audit_sink.clone(),
        );
        let clients = ClientService::new(client_repo, store.clone(), rbac.clone(), audit_sink.clone());
        let documents = DocumentService::new(directory, store, rbac, audit_sink);

        Ok(Self {
            pool,
            auth,
            users,
            clients,
            documents,
        })
    }

    /// Resolve the `--token` argument into a request context.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<RequestContext, AppError> {
        let token = token.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
            AppError::authentication("No token given; run `lexvault login` and pass --token or set LEXVAULT_TOKEN")
        })?;
        self.auth.authenticate(token.trim(), None).await
    }
}

/// Prompt for a line of text unless `value` was given.
pub fn text_or_prompt(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Prompt for a password unless `value` was given.
pub fn password_or_prompt(
    value: &Option<String>,
    prompt: &str,
    confirm: bool,
) -> Result<String, AppError> {
    if let Some(v) = value {
        return Ok(v.clone());
    }
    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
