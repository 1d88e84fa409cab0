//! User profile entity

use std::fmt;

use serde::{Deserialize, Serialize};

use super::edit::{coerce_flag, coerce_text, ProfileEdit};
use crate::error::Result;

/// Identity binding and account-level switches of the signed-in user.
///
/// Only `sender_block_list` and `captcha_enabled` are edited locally;
/// `api_key` and `callback_url` change only when the server rotates the key.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider username
    #[serde(rename = "github_login")]
    pub external_login: String,
    /// Identity-provider numeric id
    #[serde(rename = "github_id")]
    pub external_id: i64,
    /// Generated API key
    #[serde(rename = "app_key")]
    pub api_key: String,
    /// Webhook URL derived from the API key
    pub callback_url: String,
    /// Delimiter-separated sender list, interpreted by the backend
    #[serde(rename = "block_list")]
    pub sender_block_list: String,
    /// Bot detection on incoming webhooks
    #[serde(rename = "captcha")]
    pub captcha_enabled: bool,
}

impl UserProfile {
    /// Decodes a server payload. Missing or mistyped fields are an error.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns a copy with exactly one editable field replaced.
    #[must_use]
    pub fn with_edit(&self, edit: ProfileEdit) -> Self {
        let mut next = self.clone();
        match edit {
            ProfileEdit::SenderBlockList(raw) => next.sender_block_list = coerce_text(raw),
            ProfileEdit::CaptchaEnabled(raw) => next.captcha_enabled = coerce_flag(raw),
        }
        next
    }
}

impl fmt::Debug for UserProfile {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UserProfile")
            .field("external_login", &self.external_login)
            .field("external_id", &self.external_id)
            .field("api_key", &"[REDACTED]")
            .field("callback_url", &"[REDACTED]")
            .field("sender_block_list", &self.sender_block_list)
            .field("captcha_enabled", &self.captcha_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ALICE: &str = r#"{"github_login":"alice","github_id":1,"app_key":"k1","callback_url":"https://x/k1","block_list":"","captcha":false}"#;

    fn alice() -> UserProfile {
        UserProfile {
            external_login: "alice".to_string(),
            external_id: 1,
            api_key: "k1".to_string(),
            callback_url: "https://x/k1".to_string(),
            sender_block_list: String::new(),
            captcha_enabled: false,
        }
    }

    #[test]
    fn decodes_wire_payload_exactly() {
        assert_eq!(UserProfile::from_json(ALICE).unwrap(), alice());
    }

    #[test]
    fn encodes_with_wire_names() {
        let encoded: serde_json::Value = serde_json::from_str(&alice().to_json().unwrap()).unwrap();
        let expected: serde_json::Value = serde_json::from_str(ALICE).unwrap();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let payload = r#"{"id":7,"github_login":"alice","github_id":1,"app_key":"k1","callback_url":"https://x/k1","block_list":"","captcha":false}"#;
        assert_eq!(UserProfile::from_json(payload).unwrap(), alice());
    }

    #[test]
    fn decode_fails_closed_on_missing_or_mistyped_fields() {
        assert!(UserProfile::from_json(r#"{"github_login":"alice"}"#).is_err());
        assert!(UserProfile::from_json(
            r#"{"github_login":"alice","github_id":"1","app_key":"k1","callback_url":"","block_list":"","captcha":false}"#
        )
        .is_err());
        assert!(UserProfile::from_json("").is_err());
    }

    #[test]
    fn edit_replaces_only_the_targeted_field() {
        let base = alice();
        let edited = base.with_edit(ProfileEdit::SenderBlockList(Some(
            "spam@example.com\nbot".to_string(),
        )));
        assert_eq!(
            edited,
            UserProfile {
                sender_block_list: "spam@example.com\nbot".to_string(),
                ..alice()
            }
        );
        assert_eq!(base, alice());
    }

    #[test]
    fn edit_is_idempotent() {
        let edit = ProfileEdit::CaptchaEnabled(Some(true));
        let once = alice().with_edit(edit.clone());
        let twice = once.with_edit(edit);
        assert_eq!(once, twice);
        assert!(once.captcha_enabled);
    }

    #[test]
    fn missing_input_falls_back_to_defaults() {
        let enabled = UserProfile {
            sender_block_list: "someone".to_string(),
            captcha_enabled: true,
            ..alice()
        };
        let cleared = enabled
            .with_edit(ProfileEdit::SenderBlockList(None))
            .with_edit(ProfileEdit::CaptchaEnabled(None));
        assert_eq!(cleared, alice());
    }

    #[test]
    fn debug_redacts_key_material() {
        let rendered = format!("{:?}", alice());
        assert!(!rendered.contains("k1"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
