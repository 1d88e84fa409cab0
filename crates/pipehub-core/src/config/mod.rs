//! Client configuration.
//!
//! `ClientConfig` is built once by the front end and handed to the transport.
//! Nothing in this crate reads process-wide settings on its own; tests build
//! a config that points at a local server.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Backend used when no override is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://api.pipehub.net";

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "PIPEHUB_BACKEND_URL";

/// Variable name used by the web build; read when `PIPEHUB_BACKEND_URL` is unset.
pub const LEGACY_BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Environment variable holding the raw session cookie (`name=value`).
pub const SESSION_COOKIE_ENV: &str = "PIPEHUB_SESSION";

/// Connection settings for the PipeHub backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    backend_url: String,
    #[serde(default)]
    session_cookie: Option<String>,
}

impl ClientConfig {
    pub fn new(backend_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            backend_url: normalize_base_url(backend_url.as_ref())?,
            session_cookie: None,
        })
    }

    /// Attaches the session cookie sent with every request.
    ///
    /// Blank values clear the cookie.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = normalize_text_option(cookie);
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend_url = normalize_text_option(lookup(BACKEND_URL_ENV))
            .or_else(|| normalize_text_option(lookup(LEGACY_BACKEND_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Ok(Self::new(backend_url)?.with_session_cookie(lookup(SESSION_COOKIE_ENV)))
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            session_cookie: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("backend_url", &self.backend_url)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Trims the URL, requires an http(s) scheme and drops trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let value = normalize_text_option(Some(raw.to_string())).ok_or_else(|| {
        Error::InvalidConfiguration("backend URL must not be empty".to_string())
    })?;
    if !is_http_url(&value) {
        return Err(Error::InvalidConfiguration(
            "backend URL must include http:// or https://".to_string(),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url("  ").is_err());
        assert!(normalize_base_url("api.pipehub.net").is_err());
    }

    #[test]
    fn normalize_base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url(" https://api.pipehub.net/ ").unwrap(),
            "https://api.pipehub.net"
        );
    }

    #[test]
    fn from_lookup_defaults_to_public_backend() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL);
        assert_eq!(config.session_cookie(), None);
    }

    #[test]
    fn from_lookup_prefers_namespaced_variable() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (BACKEND_URL_ENV, "http://localhost:8080/"),
            (LEGACY_BACKEND_URL_ENV, "https://ignored.example.com"),
            (SESSION_COOKIE_ENV, " id=abc "),
        ]))
        .unwrap();
        assert_eq!(config.backend_url(), "http://localhost:8080");
        assert_eq!(config.session_cookie(), Some("id=abc"));
    }

    #[test]
    fn from_lookup_falls_back_to_legacy_variable() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            LEGACY_BACKEND_URL_ENV,
            "https://staging.pipehub.net",
        )]))
        .unwrap();
        assert_eq!(config.backend_url(), "https://staging.pipehub.net");
    }

    #[test]
    fn debug_redacts_session_cookie() {
        let config = ClientConfig::default().with_session_cookie(Some("id=secret".to_string()));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
