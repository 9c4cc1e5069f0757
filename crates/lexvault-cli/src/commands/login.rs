//! Sign-in command.

use clap::Args;

use lexvault_core::error::AppError;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for `lexvault login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account e-mail
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Execute the login command
pub async fn execute(
    args: &LoginArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let email = super::text_or_prompt(&args.email, "Email")?;
    let password = super::password_or_prompt(&args.password, "Password", false)?;

    let response = services.auth.login(&email, &password, None).await?;

    match format {
        OutputFormat::Json => output::print_json(&response, "{}"),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Signed in as {} ({})",
                response.user.full_name, response.user.role
            ));
            output::print_kv("Token", &response.token);
            println!();
            println!("export LEXVAULT_TOKEN={}", response.token);
        }
    }
    Ok(())
}
