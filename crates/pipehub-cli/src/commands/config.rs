use pipehub_core::config::{BACKEND_URL_ENV, LEGACY_BACKEND_URL_ENV, SESSION_COOKIE_ENV};
use pipehub_core::util::normalize_text_option;

use crate::auth::load_stored_cookie;
use crate::cli::ConfigCommands;
use crate::commands::common::resolve_client_config;
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    backend_url: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { no_activate } => {
            run_config_init(global_profile, backend_url, no_activate)
        }
        ConfigCommands::Show => run_config_show(global_profile, backend_url),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    backend_url: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let merged_backend_url = normalize_text_option(backend_url)
        .or_else(|| normalize_text_option(std::env::var(BACKEND_URL_ENV).ok()))
        .or_else(|| normalize_text_option(std::env::var(LEGACY_BACKEND_URL_ENV).ok()));

    let profile = config.profile_mut_or_default(&profile_name);
    if merged_backend_url.is_some() {
        profile
            .set_backend_url(merged_backend_url)
            .map_err(CliError::Config)?;
    }

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    println!("Run `pipehub auth login --cookie <name=value>` to store a session.");
    Ok(())
}

pub fn run_config_show(
    global_profile: Option<&str>,
    backend_url: Option<String>,
) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let stored_cookie = load_stored_cookie(&profile_name)?;
    let resolved = resolve_client_config(
        backend_url,
        config.profile(&profile_name),
        stored_cookie,
        |name| std::env::var(name).ok(),
    )?;

    let path = default_config_path().map_err(CliError::Config)?;
    println!("config file:    {}", path.display());
    println!(
        "active profile: {}",
        config.active_profile.as_deref().unwrap_or("(none)")
    );
    println!(
        "profile:        {}{}",
        profile_name,
        if config.profile(&profile_name).is_some() {
            ""
        } else {
            " (not configured)"
        }
    );
    println!("backend url:    {}", resolved.backend_url());
    println!(
        "session:        {}",
        if normalize_text_option(std::env::var(SESSION_COOKIE_ENV).ok()).is_some() {
            "from environment"
        } else if resolved.session_cookie().is_some() {
            "stored in keychain"
        } else {
            "none"
        }
    );
    Ok(())
}
