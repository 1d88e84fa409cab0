use std::io;

use pipehub_core::controller::RotationOutcome;

use crate::commands::common::{
    build_controller, confirm, load_client_config, load_settings, until_cancelled,
};
use crate::error::CliError;

const ROTATION_QUESTION: &str =
    "Generate a new API key? Webhooks using the current key will stop working.";

pub async fn run_rotate_key(
    global_profile: Option<&str>,
    backend_url: Option<String>,
    yes: bool,
) -> Result<(), CliError> {
    let (_, config) = load_client_config(global_profile, backend_url)?;
    let mut controller = build_controller(&config)?;
    load_settings(&mut controller).await?;

    controller.open_confirm();
    let confirmed = yes || confirm(ROTATION_QUESTION, io::stdin().lock(), io::stderr())?;
    if !confirmed {
        controller.cancel_confirm();
        println!("API key unchanged");
        return Ok(());
    }

    let token = controller.cancellation_token();
    match until_cancelled(&token, controller.confirm_rotation()).await? {
        RotationOutcome::Rotated => {
            let profile = controller.profile();
            println!("api key:      {}", profile.api_key);
            println!("callback url: {}", profile.callback_url);
            Ok(())
        }
        RotationOutcome::Cancelled => Err(CliError::Cancelled),
        RotationOutcome::NotConfirmed | RotationOutcome::Failed => Err(CliError::RotationFailed),
    }
}
