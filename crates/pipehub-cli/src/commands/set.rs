use pipehub_core::controller::SaveReport;

use crate::commands::common::{
    build_controller, load_client_config, load_settings, parse_assignments, until_cancelled,
    FieldAssignment,
};
use crate::error::CliError;

pub async fn run_set(
    global_profile: Option<&str>,
    backend_url: Option<String>,
    assignments: &[String],
) -> Result<(), CliError> {
    // Reject bad input before touching the network.
    let edits = parse_assignments(assignments)?;

    let (_, config) = load_client_config(global_profile, backend_url)?;
    let mut controller = build_controller(&config)?;
    load_settings(&mut controller).await?;

    for edit in edits {
        match edit {
            FieldAssignment::Profile(edit) => controller.update_profile(edit),
            FieldAssignment::Channel(edit) => controller.update_channel(edit),
        }
    }

    let token = controller.cancellation_token();
    let report = until_cancelled(&token, controller.save()).await?;
    check_save_report(report)
}

/// Only the profile save decides the exit status; a rejected channel save
/// is reported but does not fail the command.
pub fn check_save_report(report: SaveReport) -> Result<(), CliError> {
    if let Some(status) = report.channel_status.filter(|status| *status >= 400) {
        eprintln!("Warning: notification channel was not saved (HTTP {status})");
    } else if report.channel_status.is_none() {
        eprintln!("Warning: notification channel was not saved (no response)");
    }

    if report.acknowledged {
        return Ok(());
    }
    Err(CliError::SaveRejected(report.profile_status.map_or_else(
        || "no response".to_string(),
        |status| format!("HTTP {status}"),
    )))
}
