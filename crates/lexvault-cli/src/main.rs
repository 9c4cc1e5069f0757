//! LexVault CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lexvault_core::config::LoggingConfig;

mod commands;
mod output;

use commands::Cli;

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
