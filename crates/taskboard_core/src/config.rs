//! Persisted client configuration.
//!
//! Stored as TOML at `~/.config/taskboard/config.toml` (platform config dir).
//! Besides relay endpoints and the retry interval, this doubles as the
//! identity store for the last selected project and member name.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Relay used when `use_local` is off.
pub const DEFAULT_REMOTE_URL: &str = "wss://node-server-ws.onrender.com";

/// Relay used for local development.
pub const DEFAULT_LOCAL_URL: &str = "ws://localhost:8080";

/// Seconds between reconnect attempts.
pub const DEFAULT_RECONNECT_INTERVAL_SECS: u64 = 5;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote relay endpoint.
    pub remote_url: String,

    /// Local development relay endpoint.
    pub local_url: String,

    /// Connect to `local_url` instead of `remote_url`.
    pub use_local: bool,

    /// Fixed interval between reconnect attempts, in seconds.
    pub reconnect_interval_secs: u64,

    /// Platform tag stamped on outbound envelopes.
    pub platform: String,

    /// Last selected project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Display name announced with `member_join`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            local_url: DEFAULT_LOCAL_URL.to_string(),
            use_local: false,
            reconnect_interval_secs: DEFAULT_RECONNECT_INTERVAL_SECS,
            platform: "cli".to_string(),
            project_id: None,
            member_name: None,
        }
    }
}

impl Config {
    /// Get the config file path (~/.config/taskboard/config.toml)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskboard").join("config.toml"))
    }

    /// No config directory exists on wasm.
    #[cfg(target_arch = "wasm32")]
    pub fn config_path() -> Option<PathBuf> {
        None
    }

    /// Load config from the default location, or defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// The relay endpoint selected by `use_local`, normalized to `ws://`/`wss://`.
    pub fn endpoint(&self) -> Result<String, ConfigError> {
        let raw = if self.use_local {
            &self.local_url
        } else {
            &self.remote_url
        };
        normalize_ws_url(raw)
    }

    /// Reconnect interval as a [`Duration`]. Zero is bumped to one second.
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_secs.max(1))
    }
}

/// Rewrite `http(s)://` to `ws(s)://` and check the result parses as a URL.
pub fn normalize_ws_url(raw: &str) -> Result<String, ConfigError> {
    let rewritten = raw
        .trim()
        .replace("https://", "wss://")
        .replace("http://", "ws://");

    let parsed = url::Url::parse(&rewritten).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "ws" | "wss" => Ok(rewritten),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
        assert_eq!(config.reconnect_interval(), Duration::from_secs(5));
        assert!(config.project_id.is_none());
    }

    #[test]
    fn test_endpoint_selection() {
        let mut config = Config::default();
        assert_eq!(config.endpoint().unwrap(), DEFAULT_REMOTE_URL);

        config.use_local = true;
        assert_eq!(config.endpoint().unwrap(), DEFAULT_LOCAL_URL);
    }

    #[test]
    fn test_endpoint_rewrites_http() {
        let config = Config {
            remote_url: "https://relay.example.com/ws".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint().unwrap(), "wss://relay.example.com/ws");
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        let config = Config {
            remote_url: "ftp://relay.example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.endpoint(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = Config {
            reconnect_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.reconnect_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_save_and_load_roundtrip_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            project_id: Some("P1".to_string()),
            member_name: Some("Ada".to_string()),
            use_local: true,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "project_id = \"P9\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.project_id.as_deref(), Some("P9"));
        assert_eq!(loaded.remote_url, DEFAULT_REMOTE_URL);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_local = \"maybe\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
