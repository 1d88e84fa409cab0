//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pipehub_core::config::normalize_base_url;
use pipehub_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";
pub const PROFILE_ENV: &str = "PIPEHUB_PROFILE";
pub const DEFAULT_PROFILE_NAME: &str = "default";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub backend_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("pipehub").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        self.resolve_profile_name_with(explicit, std::env::var(PROFILE_ENV).ok().as_deref())
    }

    /// Resolution order: explicit flag, environment, active profile, `default`.
    pub fn resolve_profile_name_with(&self, explicit: Option<&str>, env: Option<&str>) -> String {
        normalize_profile_name(explicit)
            .or_else(|| normalize_profile_name(env))
            .or_else(|| normalize_profile_name(self.active_profile.as_deref()))
            .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    pub fn backend_url(&self) -> Option<String> {
        normalize_text_option(self.backend_url.clone())
    }

    /// Stores a validated backend URL, or clears it when `url` is blank.
    pub fn set_backend_url(&mut self, url: Option<String>) -> Result<(), String> {
        self.backend_url = match normalize_text_option(url) {
            Some(url) => Some(normalize_base_url(&url).map_err(|error| error.to_string())?),
            None => None,
        };
        Ok(())
    }

    fn normalize(&mut self) {
        self.backend_url = normalize_text_option(self.backend_url.clone());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_profile_name_rejects_empty() {
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(normalize_profile_name(Some(" ")), None);
        assert_eq!(normalize_profile_name(Some(" work ")), Some("work".to_string()));
    }

    #[test]
    fn config_roundtrip_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some(" staging ".to_string()),
            profiles: BTreeMap::new(),
        };
        config.profiles.insert(
            "staging".to_string(),
            CliProfile {
                backend_url: Some(" https://staging.pipehub.net ".to_string()),
            },
        );

        config.save_to_path(&path).unwrap();
        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.active_profile.as_deref(), Some("staging"));
        assert_eq!(
            loaded.profile("staging").and_then(CliProfile::backend_url),
            Some("https://staging.pipehub.net".to_string())
        );
    }

    #[test]
    fn missing_config_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliProfilesConfig::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, CliProfilesConfig::default());
    }

    #[test]
    fn malformed_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        let error = CliProfilesConfig::load_from_path(&path).unwrap_err();
        assert!(error.starts_with("Failed to parse config"));
    }

    #[test]
    fn resolve_profile_name_prefers_explicit_then_env_then_active() {
        let config = CliProfilesConfig {
            version: 1,
            active_profile: Some("work".to_string()),
            profiles: BTreeMap::new(),
        };
        assert_eq!(
            config.resolve_profile_name_with(Some("mobile"), Some("env")),
            "mobile"
        );
        assert_eq!(config.resolve_profile_name_with(None, Some("env")), "env");
        assert_eq!(config.resolve_profile_name_with(None, Some("  ")), "work");
        assert_eq!(
            CliProfilesConfig::default().resolve_profile_name_with(None, None),
            DEFAULT_PROFILE_NAME
        );
    }

    #[test]
    fn set_backend_url_validates_and_trims() {
        let mut profile = CliProfile::default();
        profile
            .set_backend_url(Some("https://api.pipehub.net/".to_string()))
            .unwrap();
        assert_eq!(
            profile.backend_url.as_deref(),
            Some("https://api.pipehub.net")
        );

        assert!(profile
            .set_backend_url(Some("api.pipehub.net".to_string()))
            .is_err());

        profile.set_backend_url(Some("  ".to_string())).unwrap();
        assert_eq!(profile.backend_url, None);
    }
}
