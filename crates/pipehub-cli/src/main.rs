//! PipeHub CLI - Command-line interface for PipeHub account settings
//!
//! Shows and edits the account profile and notification channel, and
//! rotates the API key.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod shell;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::rotate::run_rotate_key;
use crate::commands::set::run_set;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "pipehub=info"
            .parse::<tracing_subscriber::filter::Directive>()
            .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();
    let backend_url = cli.backend_url;

    match cli.command {
        Commands::Show { json, reveal } => run_show(profile, backend_url, json, reveal).await,
        Commands::Set { assignments } => run_set(profile, backend_url, &assignments).await,
        Commands::RotateKey { yes } => run_rotate_key(profile, backend_url, yes).await,
        Commands::Config { command } => run_config(command, profile, backend_url),
        Commands::Auth { command } => run_auth(command, profile, backend_url).await,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}
