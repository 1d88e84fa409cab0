//! Terminal implementation of the controller's side effects.

use std::sync::Mutex;

use pipehub_core::{Acknowledgement, SettingsShell};
use url::Url;

/// Prints acknowledgements and remembers where a redirect pointed.
#[derive(Debug)]
pub struct TerminalShell {
    base_url: String,
    redirect: Mutex<Option<String>>,
}

impl TerminalShell {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            redirect: Mutex::new(None),
        }
    }

    /// Absolute target of the last redirect, if one was requested.
    pub fn redirect_target(&self) -> Option<String> {
        self.redirect
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl SettingsShell for TerminalShell {
    fn redirect(&self, location: &str) {
        let target = resolve_location(&self.base_url, location);
        eprintln!("Session expired, sign in at {target}");
        if let Ok(mut guard) = self.redirect.lock() {
            *guard = Some(target);
        }
    }

    fn acknowledge(&self, acknowledgement: Acknowledgement) {
        match acknowledgement {
            Acknowledgement::Saved => println!("Success"),
            Acknowledgement::KeyRotated => println!("Success: API key rotated"),
        }
    }
}

/// Resolves a possibly relative `Location` against the backend for display.
///
/// Falls back to the raw value when either side is not a valid URL.
pub fn resolve_location(base_url: &str, location: &str) -> String {
    Url::parse(base_url)
        .and_then(|base| base.join(location))
        .map_or_else(|_| location.to_string(), String::from)
}
