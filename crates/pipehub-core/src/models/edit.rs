//! Field-level draft edits and their input coercion rules.
//!
//! Raw input arrives the way a form delivers it: maybe missing, maybe
//! malformed. Coercion never fails; the defaults below are part of the
//! contract with the backend.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Editable fields of a [`UserProfile`](super::UserProfile).
///
/// Identity and key fields are read-only and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    SenderBlockList,
    CaptchaEnabled,
}

/// Editable fields of a [`NotificationChannel`](super::NotificationChannel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelField {
    CorpId,
    AgentId,
    Secret,
    TelegramBotToken,
    TelegramChatId,
}

impl ProfileField {
    pub const ALL: [Self; 2] = [Self::SenderBlockList, Self::CaptchaEnabled];

    /// Name used on the wire.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::SenderBlockList => "block_list",
            Self::CaptchaEnabled => "captcha",
        }
    }
}

impl ChannelField {
    pub const ALL: [Self; 5] = [
        Self::CorpId,
        Self::AgentId,
        Self::Secret,
        Self::TelegramBotToken,
        Self::TelegramChatId,
    ];

    /// Name used on the wire.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::CorpId => "corp_id",
            Self::AgentId => "agent_id",
            Self::Secret => "secret",
            Self::TelegramBotToken => "telegram_bot_token",
            Self::TelegramChatId => "telegram_chat_id",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.wire_name())
    }
}

impl fmt::Display for ChannelField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.wire_name())
    }
}

impl FromStr for ProfileField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match normalize_field_name(value).as_str() {
            "block_list" | "sender_block_list" => Ok(Self::SenderBlockList),
            "captcha" | "captcha_enabled" => Ok(Self::CaptchaEnabled),
            _ => Err(Error::UnknownField(value.trim().to_string())),
        }
    }
}

impl FromStr for ChannelField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match normalize_field_name(value).as_str() {
            "corp_id" => Ok(Self::CorpId),
            "agent_id" => Ok(Self::AgentId),
            "secret" => Ok(Self::Secret),
            "telegram_bot_token" | "bot_token" => Ok(Self::TelegramBotToken),
            "telegram_chat_id" | "chat_id" => Ok(Self::TelegramChatId),
            _ => Err(Error::UnknownField(value.trim().to_string())),
        }
    }
}

/// A single edit to the profile draft, carrying the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEdit {
    SenderBlockList(Option<String>),
    CaptchaEnabled(Option<bool>),
}

/// A single edit to the channel draft, carrying the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEdit {
    CorpId(Option<String>),
    AgentId(Option<String>),
    Secret(Option<String>),
    TelegramBotToken(Option<String>),
    TelegramChatId(Option<String>),
}

impl ProfileEdit {
    pub const fn field(&self) -> ProfileField {
        match self {
            Self::SenderBlockList(_) => ProfileField::SenderBlockList,
            Self::CaptchaEnabled(_) => ProfileField::CaptchaEnabled,
        }
    }

    /// Builds an edit from textual input, as typed on a command line.
    ///
    /// The captcha flag accepts `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn from_text(field: ProfileField, raw: Option<String>) -> Result<Self> {
        match field {
            ProfileField::SenderBlockList => Ok(Self::SenderBlockList(raw)),
            ProfileField::CaptchaEnabled => {
                let flag = raw.as_deref().map(parse_flag).transpose()?;
                Ok(Self::CaptchaEnabled(flag))
            }
        }
    }
}

impl ChannelEdit {
    pub const fn field(&self) -> ChannelField {
        match self {
            Self::CorpId(_) => ChannelField::CorpId,
            Self::AgentId(_) => ChannelField::AgentId,
            Self::Secret(_) => ChannelField::Secret,
            Self::TelegramBotToken(_) => ChannelField::TelegramBotToken,
            Self::TelegramChatId(_) => ChannelField::TelegramChatId,
        }
    }

    /// Builds an edit from textual input. Every channel field takes text.
    pub fn from_text(field: ChannelField, raw: Option<String>) -> Self {
        match field {
            ChannelField::CorpId => Self::CorpId(raw),
            ChannelField::AgentId => Self::AgentId(raw),
            ChannelField::Secret => Self::Secret(raw),
            ChannelField::TelegramBotToken => Self::TelegramBotToken(raw),
            ChannelField::TelegramChatId => Self::TelegramChatId(raw),
        }
    }
}

/// Text fields take the input verbatim; missing input becomes empty.
pub fn coerce_text(raw: Option<String>) -> String {
    raw.unwrap_or_default()
}

/// Missing input turns the flag off.
pub fn coerce_flag(raw: Option<bool>) -> bool {
    raw.unwrap_or(false)
}

/// Parses the leading integer of `raw`, yielding `0` when there is none.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Values outside the `i64` range also yield `0`.
pub fn coerce_agent_id(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digit_count = unsigned
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digit_count];
    if digits.is_empty() {
        return 0;
    }

    let parsed = if negative {
        format!("-{digits}").parse::<i64>()
    } else {
        digits.parse::<i64>()
    };
    parsed.unwrap_or(0)
}

fn normalize_field_name(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        other => Err(Error::InvalidInput(format!(
            "expected true/false for captcha, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_defaults_to_zero_for_missing_or_malformed_input() {
        assert_eq!(coerce_agent_id(None), 0);
        assert_eq!(coerce_agent_id(Some("")), 0);
        assert_eq!(coerce_agent_id(Some("abc")), 0);
        assert_eq!(coerce_agent_id(Some("-")), 0);
        assert_eq!(coerce_agent_id(Some("99999999999999999999")), 0);
    }

    #[test]
    fn agent_id_parses_leading_integer() {
        assert_eq!(coerce_agent_id(Some("42")), 42);
        assert_eq!(coerce_agent_id(Some("  1000002")), 1_000_002);
        assert_eq!(coerce_agent_id(Some("42abc")), 42);
        assert_eq!(coerce_agent_id(Some("12.5")), 12);
        assert_eq!(coerce_agent_id(Some(" -7")), -7);
        assert_eq!(coerce_agent_id(Some("+8")), 8);
    }

    #[test]
    fn flag_and_text_defaults() {
        assert!(!coerce_flag(None));
        assert!(coerce_flag(Some(true)));
        assert!(!coerce_flag(Some(false)));
        assert_eq!(coerce_text(None), "");
        assert_eq!(coerce_text(Some(" keep spaces ".to_string())), " keep spaces ");
    }

    #[test]
    fn field_names_accept_wire_and_kebab_forms() {
        assert_eq!(
            "block-list".parse::<ProfileField>().unwrap(),
            ProfileField::SenderBlockList
        );
        assert_eq!(
            "captcha".parse::<ProfileField>().unwrap(),
            ProfileField::CaptchaEnabled
        );
        assert_eq!(
            "Telegram-Bot-Token".parse::<ChannelField>().unwrap(),
            ChannelField::TelegramBotToken
        );
        assert_eq!(
            "agent_id".parse::<ChannelField>().unwrap(),
            ChannelField::AgentId
        );
    }

    #[test]
    fn read_only_profile_fields_are_not_addressable() {
        for name in ["app_key", "callback_url", "github_login", "github_id"] {
            let error = name.parse::<ProfileField>().unwrap_err();
            assert!(matches!(error, Error::UnknownField(_)));
        }
    }

    #[test]
    fn wire_names_parse_back_to_the_same_field() {
        for field in ProfileField::ALL {
            assert_eq!(field.wire_name().parse::<ProfileField>().unwrap(), field);
        }
        for field in ChannelField::ALL {
            assert_eq!(field.wire_name().parse::<ChannelField>().unwrap(), field);
        }
    }

    #[test]
    fn captcha_text_input_is_parsed_as_flag() {
        assert_eq!(
            ProfileEdit::from_text(ProfileField::CaptchaEnabled, Some("on".to_string())).unwrap(),
            ProfileEdit::CaptchaEnabled(Some(true))
        );
        assert_eq!(
            ProfileEdit::from_text(ProfileField::CaptchaEnabled, None).unwrap(),
            ProfileEdit::CaptchaEnabled(None)
        );
        assert!(
            ProfileEdit::from_text(ProfileField::CaptchaEnabled, Some("maybe".to_string()))
                .is_err()
        );
    }

    #[test]
    fn channel_text_input_keeps_raw_value() {
        let edit = ChannelEdit::from_text(ChannelField::AgentId, Some("12x".to_string()));
        assert_eq!(edit, ChannelEdit::AgentId(Some("12x".to_string())));
        assert_eq!(edit.field(), ChannelField::AgentId);
    }
}
