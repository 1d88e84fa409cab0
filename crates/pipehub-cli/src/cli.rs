use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pipehub")]
#[command(about = "Manage PipeHub account settings from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Backend base URL override
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the account profile and notification channel
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print keys and secrets in full
        #[arg(long)]
        reveal: bool,
    },
    /// Edit settings fields and save them (e.g. `captcha=on agent_id=1000002`)
    Set {
        /// One or more `field=value` pairs
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
    },
    /// Generate a new API key; the current key stops working
    RotateKey {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the stored session cookie
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved configuration for a profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a session cookie copied from a signed-in browser
    Login {
        /// Cookie in `name=value` form
        #[arg(long, value_name = "COOKIE")]
        cookie: String,
    },
    /// Check whether the stored session is still accepted
    Status,
    /// Forget the stored session cookie
    Logout,
}
