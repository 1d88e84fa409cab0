use std::future::Future;
use std::io::{BufRead, Write};

use pipehub_core::config::{
    BACKEND_URL_ENV, DEFAULT_BACKEND_URL, LEGACY_BACKEND_URL_ENV, SESSION_COOKIE_ENV,
};
use pipehub_core::controller::{LoadOutcome, LoadReport};
use pipehub_core::models::{ChannelField, ProfileField};
use pipehub_core::util::{mask_secret, normalize_text_option};
use pipehub_core::{
    ChannelEdit, ClientConfig, HttpTransport, NotificationChannel, ProfileEdit,
    SettingsController, UserProfile,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::auth::load_stored_cookie;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;
use crate::shell::TerminalShell;

pub type CliController = SettingsController<HttpTransport, TerminalShell>;

/// One parsed `field=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAssignment {
    Profile(ProfileEdit),
    Channel(ChannelEdit),
}

/// Backend URL precedence: flag, environment, profile, built-in default.
/// The cookie comes from the environment first, then the keychain.
pub fn resolve_client_config(
    cli_backend_url: Option<String>,
    profile: Option<&CliProfile>,
    stored_cookie: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, CliError> {
    let backend_url = normalize_text_option(cli_backend_url)
        .or_else(|| normalize_text_option(lookup(BACKEND_URL_ENV)))
        .or_else(|| normalize_text_option(lookup(LEGACY_BACKEND_URL_ENV)))
        .or_else(|| profile.and_then(CliProfile::backend_url))
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    let cookie = normalize_text_option(lookup(SESSION_COOKIE_ENV)).or(stored_cookie);
    Ok(ClientConfig::new(backend_url)?.with_session_cookie(cookie))
}

/// Loads the profile config and keychain entry for the selected profile.
pub fn load_client_config(
    global_profile: Option<&str>,
    cli_backend_url: Option<String>,
) -> Result<(String, ClientConfig), CliError> {
    let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = profiles.resolve_profile_name(global_profile);
    let stored_cookie = load_stored_cookie(&profile_name)?;
    let config = resolve_client_config(
        cli_backend_url,
        profiles.profile(&profile_name),
        stored_cookie,
        |name| std::env::var(name).ok(),
    )?;
    tracing::debug!(profile = %profile_name, ?config, "resolved client config");
    Ok((profile_name, config))
}

/// Builds a controller whose token is cancelled on Ctrl-C.
pub fn build_controller(config: &ClientConfig) -> Result<CliController, CliError> {
    let transport = HttpTransport::new(config)?;
    let shell = TerminalShell::new(config.backend_url());
    let controller = SettingsController::new(transport, shell);
    watch_interrupt(controller.cancellation_token());
    Ok(controller)
}

fn watch_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; discarding pending responses");
            token.cancel();
        }
    });
}

/// Runs `future` unless `token` is cancelled first.
pub async fn until_cancelled<F: Future>(
    token: &CancellationToken,
    future: F,
) -> Result<F::Output, CliError> {
    tokio::select! {
        output = future => Ok(output),
        () = token.cancelled() => Err(CliError::Cancelled),
    }
}

/// Loads both drafts and fails unless the profile was loaded.
pub async fn load_settings(controller: &mut CliController) -> Result<(), CliError> {
    let token = controller.cancellation_token();
    let report = until_cancelled(&token, controller.load()).await?;
    check_load_report(report)
}

/// A failed channel fetch is not an error: the draft falls back to an empty
/// channel, which is also what a new account sees.
pub fn check_load_report(report: LoadReport) -> Result<(), CliError> {
    match report.profile {
        LoadOutcome::Loaded => {}
        LoadOutcome::SessionExpired => return Err(CliError::SessionExpired),
        LoadOutcome::Failed => return Err(CliError::LoadFailed("account profile")),
        LoadOutcome::Cancelled => return Err(CliError::Cancelled),
    }
    match report.channel {
        LoadOutcome::Loaded => Ok(()),
        LoadOutcome::Failed => {
            tracing::warn!("notification channel unavailable; showing empty channel");
            Ok(())
        }
        LoadOutcome::Cancelled => Err(CliError::Cancelled),
        // Only the profile fetch detects session expiry; kept for exhaustiveness.
        LoadOutcome::SessionExpired => Err(CliError::SessionExpired),
    }
}

pub fn parse_assignment(raw: &str) -> Result<FieldAssignment, CliError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidAssignment(raw.to_string()))?;
    let value = Some(value.to_string());

    if let Ok(field) = name.parse::<ProfileField>() {
        return Ok(FieldAssignment::Profile(ProfileEdit::from_text(field, value)?));
    }
    let field = name.parse::<ChannelField>()?;
    Ok(FieldAssignment::Channel(ChannelEdit::from_text(field, value)))
}

pub fn parse_assignments(raw: &[String]) -> Result<Vec<FieldAssignment>, CliError> {
    raw.iter().map(|item| parse_assignment(item)).collect()
}

fn display_secret(value: &str, reveal: bool) -> String {
    if reveal || value.is_empty() {
        value.to_string()
    } else {
        mask_secret(value)
    }
}

/// Masks the key when it is the last path segment of the callback URL.
fn display_callback_url(profile: &UserProfile, reveal: bool) -> String {
    let url = &profile.callback_url;
    if reveal || profile.api_key.is_empty() {
        return url.clone();
    }
    match url.rsplit_once('/') {
        Some((prefix, last)) if last == profile.api_key => {
            format!("{prefix}/{}", mask_secret(last))
        }
        _ => url.clone(),
    }
}

const fn configured_label(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "incomplete"
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

pub fn format_settings_lines(
    profile: &UserProfile,
    channel: &NotificationChannel,
    reveal: bool,
) -> Vec<String> {
    let api_key = display_secret(&profile.api_key, reveal);
    let callback_url = display_callback_url(profile, reveal);
    let secret = display_secret(&channel.secret, reveal);
    let bot_token = display_secret(&channel.telegram_bot_token, reveal);

    vec![
        "Account".to_string(),
        format!(
            "  login:              {} (id {})",
            or_placeholder(&profile.external_login),
            profile.external_id
        ),
        format!("  api key:            {}", or_placeholder(&api_key)),
        format!("  callback url:       {}", or_placeholder(&callback_url)),
        format!(
            "  block list:         {}",
            or_placeholder(&profile.sender_block_list)
        ),
        format!(
            "  captcha:            {}",
            if profile.captcha_enabled { "on" } else { "off" }
        ),
        "Notification channel".to_string(),
        format!(
            "  enterprise:         {}",
            configured_label(channel.has_enterprise_messaging())
        ),
        format!(
            "  telegram:           {}",
            configured_label(channel.has_telegram())
        ),
        format!("  corp id:            {}", or_placeholder(&channel.corp_id)),
        format!("  agent id:           {}", channel.agent_id),
        format!("  secret:             {}", or_placeholder(&secret)),
        format!("  telegram bot token: {}", or_placeholder(&bot_token)),
        format!(
            "  telegram chat id:   {}",
            or_placeholder(&channel.telegram_chat_id)
        ),
    ]
}

/// Wire-shaped JSON for both entities, secrets masked unless `reveal`.
pub fn settings_json(
    profile: &UserProfile,
    channel: &NotificationChannel,
    reveal: bool,
) -> Result<Value, CliError> {
    let mut user = serde_json::to_value(profile)?;
    let mut wechat = serde_json::to_value(channel)?;
    if !reveal {
        user["app_key"] = json!(display_secret(&profile.api_key, false));
        user["callback_url"] = json!(display_callback_url(profile, false));
        wechat["secret"] = json!(display_secret(&channel.secret, false));
        wechat["telegram_bot_token"] = json!(display_secret(&channel.telegram_bot_token, false));
    }
    Ok(json!({ "user": user, "wechat": wechat }))
}

/// Asks a yes/no question; anything but `y`/`yes` means no.
pub fn confirm(
    question: &str,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<bool, CliError> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
