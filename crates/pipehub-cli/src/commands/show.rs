use crate::commands::common::{
    build_controller, format_settings_lines, load_client_config, load_settings, settings_json,
};
use crate::error::CliError;

pub async fn run_show(
    global_profile: Option<&str>,
    backend_url: Option<String>,
    json: bool,
    reveal: bool,
) -> Result<(), CliError> {
    let (_, config) = load_client_config(global_profile, backend_url)?;
    let mut controller = build_controller(&config)?;
    load_settings(&mut controller).await?;

    if json {
        let value = settings_json(controller.profile(), controller.channel(), reveal)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for line in format_settings_lines(controller.profile(), controller.channel(), reveal) {
            println!("{line}");
        }
    }
    Ok(())
}
