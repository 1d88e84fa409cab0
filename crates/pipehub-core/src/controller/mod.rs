//! Settings controller
//!
//! Holds the two drafts (user profile and notification channel), loads them,
//! applies field edits, saves both resources and runs the confirmation-gated
//! key rotation. Nothing here returns an error: every failure is resolved at
//! its own call site into a log line or a state default.
//!
//! Concurrent requests are issued with `tokio::join!`. Each completion writes
//! only its own slice of state, so either may finish first.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{ChannelEdit, NotificationChannel, ProfileEdit, UserProfile};
use crate::transport::{ApiRequest, ApiResponse, Endpoint, SettingsTransport};
use crate::util::compact_text;


/// Redirect target when a 401 carries no `Location` header.
pub const DEFAULT_REDIRECT_LOCATION: &str = "/";

/// User-visible positive signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    Saved,
    KeyRotated,
}

/// Side effects the controller asks its front end to perform.
pub trait SettingsShell: Send + Sync {
    /// Leave the settings view for `location` (the session is gone).
    fn redirect(&self, location: &str);

    /// Show a success acknowledgement.
    fn acknowledge(&self, acknowledgement: Acknowledgement);
}

/// How one slice of state was settled by `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The server entity replaced the draft.
    Loaded,
    /// The session expired and a redirect was requested.
    SessionExpired,
    /// The request or decode failed; see the draft for what was kept.
    Failed,
    /// The controller was torn down before the response was applied.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub profile: LoadOutcome,
    pub channel: LoadOutcome,
}

/// Raw statuses from a save, for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub profile_status: Option<u16>,
    pub channel_status: Option<u16>,
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    Rotated,
    /// `confirm_rotation` was called without an open prompt.
    NotConfirmed,
    Failed,
    Cancelled,
}

/// Owns the profile and channel drafts and keeps them in sync with the backend.
pub struct SettingsController<T, S> {
    transport: T,
    shell: S,
    profile: UserProfile,
    channel: NotificationChannel,
    confirm_visible: bool,
    cancellation: CancellationToken,
}

impl<T: SettingsTransport, S: SettingsShell> SettingsController<T, S> {
    pub fn new(transport: T, shell: S) -> Self {
        Self::with_cancellation(transport, shell, CancellationToken::new())
    }

    pub fn with_cancellation(transport: T, shell: S, cancellation: CancellationToken) -> Self {
        Self {
            transport,
            shell,
            profile: UserProfile::default(),
            channel: NotificationChannel::default(),
            confirm_visible: false,
            cancellation,
        }
    }

    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub const fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    pub const fn confirm_visible(&self) -> bool {
        self.confirm_visible
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn shell(&self) -> &S {
        &self.shell
    }

    /// Token that, once cancelled, turns every pending completion into a no-op.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Stops applying responses. Requests already sent are not aborted.
    pub fn teardown(&self) {
        self.cancellation.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fetches both entities concurrently and replaces each draft on success.
    ///
    /// A 401 on the profile fetch asks the shell to redirect instead.
    pub async fn load(&mut self) -> LoadReport {
        let Self {
            transport,
            shell,
            profile,
            channel,
            cancellation,
            ..
        } = self;
        let transport = &*transport;
        let cancellation = &*cancellation;

        let (profile, channel) = tokio::join!(
            load_profile(transport, &*shell, cancellation, profile),
            load_channel(transport, cancellation, channel),
        );
        LoadReport { profile, channel }
    }

    pub fn update_profile(&mut self, edit: ProfileEdit) {
        debug!(field = %edit.field(), "profile draft edited");
        self.profile = self.profile.with_edit(edit);
    }

    pub fn update_channel(&mut self, edit: ChannelEdit) {
        debug!(field = %edit.field(), "channel draft edited");
        self.channel = self.channel.with_edit(edit);
    }

    /// Sends both drafts concurrently.
    ///
    /// One acknowledgement is raised when the profile save succeeds; the
    /// channel result is only logged. Drafts are not refreshed afterwards.
    pub async fn save(&self) -> SaveReport {
        let (profile_status, channel_status) = tokio::join!(
            async {
                let Some(status) = put_draft(
                    &self.transport,
                    Endpoint::SaveProfile,
                    self.profile.to_json(),
                )
                .await
                else {
                    return None;
                };
                if self.cancellation.is_cancelled() {
                    debug!("profile save completed after teardown");
                    return Some((status, false));
                }
                let acknowledged = status < 400;
                if acknowledged {
                    self.shell.acknowledge(Acknowledgement::Saved);
                }
                Some((status, acknowledged))
            },
            put_draft(
                &self.transport,
                Endpoint::SaveChannel,
                self.channel.to_json(),
            ),
        );

        SaveReport {
            profile_status: profile_status.map(|(status, _)| status),
            channel_status,
            acknowledged: profile_status.is_some_and(|(_, acknowledged)| acknowledged),
        }
    }

    /// Shows the rotation prompt.
    pub fn open_confirm(&mut self) {
        self.confirm_visible = true;
    }

    /// Hides the rotation prompt without touching anything else.
    pub fn cancel_confirm(&mut self) {
        self.confirm_visible = false;
    }

    /// Closes the prompt and asks the server for a new API key.
    ///
    /// On success the whole profile is replaced by the server's copy.
    pub async fn confirm_rotation(&mut self) -> RotationOutcome {
        if !self.confirm_visible {
            warn!("key rotation requested without confirmation; ignoring");
            return RotationOutcome::NotConfirmed;
        }
        self.confirm_visible = false;

        let response = match self
            .transport
            .send(ApiRequest::new(Endpoint::RotateKey))
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "key rotation request failed");
                return RotationOutcome::Failed;
            }
        };
        if self.cancellation.is_cancelled() {
            debug!("key rotation completed after teardown");
            return RotationOutcome::Cancelled;
        }

        match decode_success(response, UserProfile::from_json) {
            Ok(profile) => {
                info!("API key rotated");
                self.profile = profile;
                self.shell.acknowledge(Acknowledgement::KeyRotated);
                RotationOutcome::Rotated
            }
            Err(error) => {
                warn!(%error, "key rotation rejected");
                RotationOutcome::Failed
            }
        }
    }
}

async fn load_profile<T: SettingsTransport, S: SettingsShell>(
    transport: &T,
    shell: &S,
    cancellation: &CancellationToken,
    slot: &mut UserProfile,
) -> LoadOutcome {
    let result = transport.send(ApiRequest::new(Endpoint::FetchProfile)).await;
    if cancellation.is_cancelled() {
        debug!("profile fetch completed after teardown");
        return LoadOutcome::Cancelled;
    }

    match result.and_then(profile_from_response) {
        Ok(profile) => {
            *slot = profile;
            LoadOutcome::Loaded
        }
        Err(Error::SessionExpired { location }) => {
            info!(%location, "session expired; redirecting");
            shell.redirect(&location);
            LoadOutcome::SessionExpired
        }
        Err(error) => {
            warn!(%error, "profile fetch failed; keeping current draft");
            LoadOutcome::Failed
        }
    }
}

async fn load_channel<T: SettingsTransport>(
    transport: &T,
    cancellation: &CancellationToken,
    slot: &mut NotificationChannel,
) -> LoadOutcome {
    let result = transport
        .send(ApiRequest::new(Endpoint::FetchChannel))
        .await
        .and_then(|response| decode_success(response, NotificationChannel::from_json));
    if cancellation.is_cancelled() {
        debug!("channel fetch completed after teardown");
        return LoadOutcome::Cancelled;
    }

    match result {
        Ok(channel) => {
            *slot = channel;
            LoadOutcome::Loaded
        }
        Err(error) => {
            debug!(%error, "channel fetch failed; using empty channel");
            *slot = NotificationChannel::default();
            LoadOutcome::Failed
        }
    }
}

/// Sends one draft and returns the status, or `None` if nothing was sent back.
async fn put_draft<T: SettingsTransport>(
    transport: &T,
    endpoint: Endpoint,
    payload: Result<String>,
) -> Option<u16> {
    let payload = match payload {
        Ok(payload) => payload,
        Err(error) => {
            warn!(%endpoint, %error, "failed to encode draft");
            return None;
        }
    };

    match transport.send(ApiRequest::with_json(endpoint, payload)).await {
        Ok(response) => {
            debug!(
                %endpoint,
                status = response.status,
                body = %compact_text(&response.body),
                "draft save answered"
            );
            if !response.is_success() {
                warn!(%endpoint, status = response.status, "draft save rejected");
            }
            Some(response.status)
        }
        Err(error) => {
            warn!(%endpoint, %error, "draft save failed");
            None
        }
    }
}

fn profile_from_response(response: ApiResponse) -> Result<UserProfile> {
    if response.is_unauthorized() {
        return Err(Error::SessionExpired {
            location: response
                .location
                .unwrap_or_else(|| DEFAULT_REDIRECT_LOCATION.to_string()),
        });
    }
    decode_success(response, UserProfile::from_json)
}

fn decode_success<Entity>(
    response: ApiResponse,
    decode: impl FnOnce(&str) -> Result<Entity>,
) -> Result<Entity> {
    if !response.is_success() {
        return Err(Error::Api {
            status: response.status,
            body: compact_text(&response.body),
        });
    }
    decode(&response.body)
}
