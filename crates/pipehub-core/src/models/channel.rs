//! Notification channel entity

use std::fmt;

use serde::{Deserialize, Serialize};

use super::edit::{coerce_agent_id, coerce_text, ChannelEdit};
use crate::error::Result;

/// Outbound notification credentials: enterprise messaging and Telegram bot.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub corp_id: String,
    pub agent_id: i64,
    pub secret: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
}

impl NotificationChannel {
    /// Decodes a server payload. Missing or mistyped fields are an error.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns a copy with exactly one field replaced.
    #[must_use]
    pub fn with_edit(&self, edit: ChannelEdit) -> Self {
        let mut next = self.clone();
        match edit {
            ChannelEdit::CorpId(raw) => next.corp_id = coerce_text(raw),
            ChannelEdit::AgentId(raw) => next.agent_id = coerce_agent_id(raw.as_deref()),
            ChannelEdit::Secret(raw) => next.secret = coerce_text(raw),
            ChannelEdit::TelegramBotToken(raw) => next.telegram_bot_token = coerce_text(raw),
            ChannelEdit::TelegramChatId(raw) => next.telegram_chat_id = coerce_text(raw),
        }
        next
    }

    pub fn has_enterprise_messaging(&self) -> bool {
        !self.corp_id.is_empty() && self.agent_id != 0 && !self.secret.is_empty()
    }

    pub fn has_telegram(&self) -> bool {
        !self.telegram_bot_token.is_empty() && !self.telegram_chat_id.is_empty()
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NotificationChannel")
            .field("corp_id", &self.corp_id)
            .field("agent_id", &self.agent_id)
            .field("secret", &"[REDACTED]")
            .field("telegram_bot_token", &"[REDACTED]")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn configured() -> NotificationChannel {
        NotificationChannel {
            corp_id: "ww1234".to_string(),
            agent_id: 1_000_002,
            secret: "corp-secret".to_string(),
            telegram_bot_token: "123456:ABCDEF".to_string(),
            telegram_chat_id: "-100200300".to_string(),
        }
    }

    #[test]
    fn decodes_wire_payload() {
        let payload = r#"{"corp_id":"ww1234","agent_id":1000002,"secret":"corp-secret","telegram_bot_token":"123456:ABCDEF","telegram_chat_id":"-100200300"}"#;
        assert_eq!(NotificationChannel::from_json(payload).unwrap(), configured());
    }

    #[test]
    fn decode_rejects_partial_payload() {
        assert!(NotificationChannel::from_json(r#"{"corp_id":"ww1234"}"#).is_err());
    }

    #[test]
    fn agent_id_edit_coerces_malformed_input_to_zero() {
        let base = configured();
        for raw in [None, Some(""), Some("abc")] {
            let edited = base.with_edit(ChannelEdit::AgentId(raw.map(str::to_string)));
            assert_eq!(
                edited,
                NotificationChannel {
                    agent_id: 0,
                    ..configured()
                }
            );
        }
        let edited = base.with_edit(ChannelEdit::AgentId(Some("42".to_string())));
        assert_eq!(edited.agent_id, 42);
    }

    #[test]
    fn text_edits_touch_only_their_field() {
        let base = configured();
        let edited = base.with_edit(ChannelEdit::TelegramChatId(None));
        assert_eq!(
            edited,
            NotificationChannel {
                telegram_chat_id: String::new(),
                ..configured()
            }
        );

        let edited = base.with_edit(ChannelEdit::CorpId(Some("ww9999".to_string())));
        assert_eq!(edited.corp_id, "ww9999");
        assert_eq!(edited.secret, base.secret);
        assert_eq!(edited.telegram_bot_token, base.telegram_bot_token);
    }

    #[test]
    fn edit_is_idempotent() {
        let edit = ChannelEdit::Secret(Some("rotated".to_string()));
        let once = configured().with_edit(edit.clone());
        assert_eq!(once.with_edit(edit), once);
    }

    #[test]
    fn integration_flags_follow_credentials() {
        assert!(configured().has_enterprise_messaging());
        assert!(configured().has_telegram());
        assert!(!NotificationChannel::default().has_enterprise_messaging());
        assert!(!NotificationChannel::default().has_telegram());
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains("corp-secret"));
        assert!(!rendered.contains("ABCDEF"));
    }
}
