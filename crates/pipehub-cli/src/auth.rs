//! Session cookie persistence in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use pipehub_core::util::normalize_text_option;

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "pipehub-cli";

#[derive(Clone)]
struct CookieStore {
    username: String,
}

impl CookieStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("session_cookie:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry, CliError> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> Result<Option<String>, CliError> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<String>, CliError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn save(&self, cookie: &str) -> Result<(), CliError> {
        self.entry()?
            .set_password(cookie)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, cookie: &str) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.insert(self.username.clone(), cookie.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<(), CliError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Checks that `raw` looks like a `name=value` cookie and trims it.
pub fn normalize_cookie(raw: &str) -> Result<String, CliError> {
    let cookie = normalize_text_option(Some(raw.to_string()))
        .ok_or_else(|| CliError::Auth("cookie must not be empty".to_string()))?;
    match cookie.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() && !value.trim().is_empty() => Ok(cookie),
        _ => Err(CliError::Auth(
            "cookie must be in name=value form".to_string(),
        )),
    }
}

pub fn load_stored_cookie(profile_name: &str) -> Result<Option<String>, CliError> {
    CookieStore::new(profile_name).load()
}

pub fn store_cookie(profile_name: &str, cookie: &str) -> Result<(), CliError> {
    CookieStore::new(profile_name).save(cookie)
}

pub fn clear_stored_cookie(profile_name: &str) -> Result<(), CliError> {
    CookieStore::new(profile_name).clear()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_cookie_requires_name_and_value() {
        assert_eq!(
            normalize_cookie("  pipehub-session=abc123 ").unwrap(),
            "pipehub-session=abc123"
        );
        assert!(normalize_cookie("").is_err());
        assert!(normalize_cookie("abc123").is_err());
        assert!(normalize_cookie("=abc123").is_err());
        assert!(normalize_cookie("pipehub-session=").is_err());
    }

    #[test]
    fn stored_cookie_is_scoped_per_profile() {
        store_cookie("auth-test-work", "session=work").unwrap();
        store_cookie("auth-test-home", "session=home").unwrap();

        assert_eq!(
            load_stored_cookie("auth-test-work").unwrap().as_deref(),
            Some("session=work")
        );

        clear_stored_cookie("auth-test-work").unwrap();
        assert_eq!(load_stored_cookie("auth-test-work").unwrap(), None);
        assert_eq!(
            load_stored_cookie("auth-test-home").unwrap().as_deref(),
            Some("session=home")
        );
        clear_stored_cookie("auth-test-home").unwrap();
    }

    #[test]
    fn clearing_missing_cookie_is_ok() {
        assert!(clear_stored_cookie("auth-test-never-stored").is_ok());
    }
}
