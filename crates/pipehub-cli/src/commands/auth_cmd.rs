use pipehub_core::controller::LoadOutcome;

use crate::auth::{clear_stored_cookie, normalize_cookie, store_cookie};
use crate::cli::AuthCommands;
use crate::commands::common::{build_controller, load_client_config, until_cancelled};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(
    command: AuthCommands,
    global_profile: Option<&str>,
    backend_url: Option<String>,
) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { cookie } => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(global_profile);
            let cookie = normalize_cookie(&cookie)?;
            store_cookie(&profile_name, &cookie)?;
            println!("Stored session for profile '{profile_name}'");
            Ok(())
        }
        AuthCommands::Status => {
            let (profile_name, config) = load_client_config(global_profile, backend_url)?;
            if config.session_cookie().is_none() {
                println!("Profile '{profile_name}' is not signed in.");
                return Ok(());
            }

            let mut controller = build_controller(&config)?;
            let token = controller.cancellation_token();
            let report = until_cancelled(&token, controller.load()).await?;
            match report.profile {
                LoadOutcome::Loaded => {
                    let profile = controller.profile();
                    println!(
                        "Profile '{}' is signed in as {} (id {})",
                        profile_name, profile.external_login, profile.external_id
                    );
                }
                LoadOutcome::SessionExpired => {
                    println!("Profile '{profile_name}' has an expired session.");
                }
                LoadOutcome::Failed => {
                    println!("Profile '{profile_name}' could not be checked; see the log above.");
                }
                LoadOutcome::Cancelled => return Err(CliError::Cancelled),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(global_profile);
            clear_stored_cookie(&profile_name)?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
