use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::{Session, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub profile: ProfileDefaults,

    #[serde(default)]
    pub ui: UiConfig,

    /// File this config was loaded from and is saved back to
    #[serde(skip)]
    path: Option<PathBuf>,

    /// Environment values layered over `backend`; never saved
    #[serde(skip)]
    overrides: BackendOverrides,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOverrides {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Persisted session tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    /// Unix timestamp (seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub email: String,
}

/// Values used for the profile row created on first sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_current_weight")]
    pub current_weight: f64,

    #[serde(default = "default_target_weight")]
    pub target_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

// Default value functions
fn default_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_username() -> String {
    "Guerriera".to_string()
}

fn default_current_weight() -> f64 {
    60.0
}

fn default_target_weight() -> f64 {
    65.0
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            auth: AuthConfig::default(),
            profile: ProfileDefaults::default(),
            ui: UiConfig::default(),
            path: None,
            overrides: BackendOverrides::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            anon_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            username: default_username(),
            current_weight: default_current_weight(),
            target_weight: default_target_weight(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.strongflow/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".strongflow"))
    }

    /// Get config file path (~/.strongflow/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load configuration from an explicit path, or the default file when `None`
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a file, falling back to defaults if it does not exist.
    /// Environment overrides are applied on top.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            tracing::info!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.path = Some(path.to_path_buf());
        config.overrides = BackendOverrides {
            url: std::env::var("STRONGFLOW_URL").ok(),
            anon_key: std::env::var("STRONGFLOW_ANON_KEY").ok(),
        };
        Ok(config)
    }

    /// Environment values in effect for this process
    pub fn overrides(&self) -> &BackendOverrides {
        &self.overrides
    }

    /// Backend settings with environment overrides applied
    pub fn effective_backend(&self) -> BackendConfig {
        let mut backend = self.backend.clone();
        if let Some(url) = &self.overrides.url {
            backend.url = url.clone();
        }
        if let Some(key) = &self.overrides.anon_key {
            backend.anon_key = key.clone();
        }
        backend
    }

    /// Default configuration that saves to `path`
    pub fn default_at(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            ..Self::default()
        }
    }

    /// Path the config is saved to
    pub fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::config_file(),
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_file = self.path()?;
        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Check if a session is stored
    pub fn is_authenticated(&self) -> bool {
        !self.auth.access_token.is_empty()
    }

    /// Rebuild the stored session, if a complete one is present
    pub fn session(&self) -> Option<Session> {
        if !self.is_authenticated() {
            return None;
        }

        let user_id = Uuid::parse_str(&self.auth.user_id).ok()?;
        let expires_at = self
            .auth
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        Some(Session {
            access_token: self.auth.access_token.clone(),
            refresh_token: self.auth.refresh_token.clone(),
            expires_at,
            user: User {
                id: user_id,
                email: (!self.auth.email.is_empty()).then(|| self.auth.email.clone()),
            },
        })
    }

    /// Store session tokens
    pub fn set_session(&mut self, session: &Session) {
        self.auth.access_token = session.access_token.clone();
        self.auth.refresh_token = session.refresh_token.clone();
        self.auth.expires_at = session.expires_at.map(|t| t.timestamp());
        self.auth.user_id = session.user.id.to_string();
        self.auth.email = session.user.email.clone().unwrap_or_default();
    }

    /// Clear stored session tokens
    pub fn clear_session(&mut self) {
        self.auth = AuthConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://localhost:54321");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.profile.username, "Guerriera");
        assert_eq!(config.profile.current_weight, 60.0);
        assert_eq!(config.profile.target_weight, 65.0);
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.backend.url, deserialized.backend.url);
        assert_eq!(config.ui.date_format, deserialized.ui.date_format);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[backend]\nanon_key = \"abc\"\n").unwrap();
        assert_eq!(config.backend.anon_key, "abc");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.profile.target_weight, 65.0);
    }

    #[test]
    fn test_session_roundtrip_through_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");

        let session = Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc.timestamp_opt(1_900_000_000, 0).single(),
            user: User {
                id: Uuid::new_v4(),
                email: Some("ana@example.com".to_string()),
            },
        };

        let mut config = Config::load_from(&path)?;
        assert!(config.session().is_none());
        config.set_session(&session);
        config.save()?;

        let reloaded = Config::load_from(&path)?;
        assert_eq!(reloaded.session(), Some(session));

        let mut cleared = reloaded;
        cleared.clear_session();
        assert!(!cleared.is_authenticated());
        assert!(cleared.session().is_none());

        Ok(())
    }

    #[test]
    fn test_env_overrides_are_not_saved() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nurl = \"https://real.example\"\nanon_key = \"file-key\"\n")?;

        std::env::set_var("STRONGFLOW_URL", "http://one-off");
        std::env::set_var("STRONGFLOW_ANON_KEY", "env-key");
        let loaded = Config::load_from(&path);
        std::env::remove_var("STRONGFLOW_URL");
        std::env::remove_var("STRONGFLOW_ANON_KEY");

        let mut config = loaded?;
        assert_eq!(config.effective_backend().url, "http://one-off");
        assert_eq!(config.effective_backend().anon_key, "env-key");

        config.clear_session();
        config.save()?;

        let reloaded = Config::load_from(&path)?;
        assert_eq!(reloaded.backend.url, "https://real.example");
        assert_eq!(reloaded.effective_backend().anon_key, "file-key");
        assert_eq!(reloaded.overrides(), &BackendOverrides::default());

        Ok(())
    }
}
