use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "feature-tags";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PORT: u16 = 17020;

/// Client and server settings.
///
/// Resolution order, lowest to highest: built-in defaults, the JSON file in
/// the user's config directory, `FTAG_*` environment variables, CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the feature API, including the `/api/v1` prefix.
    pub server_url: String,
    /// Bearer token sent by the client.
    pub api_key: Option<String>,
    /// Port the `serve` command listens on.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: format!("http://127.0.0.1:{}/api/v1", DEFAULT_PORT),
            api_key: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load the config file and apply environment overrides.
    /// Falls back to defaults if the file is missing or unreadable.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply `FTAG_URL`, `FTAG_API_KEY` and `FTAG_PORT` from `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("FTAG_URL") {
            self.server_url = url;
        }
        if let Some(key) = lookup("FTAG_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(port) = lookup("FTAG_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid FTAG_PORT: {}", port),
            }
        }
        self
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn saved_config_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            server_url: "http://features.internal/api/v1".to_string(),
            api_key: Some("secret".to_string()),
            port: 9000,
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "port": 8080 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.server_url, Config::default().server_url);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("FTAG_URL", "http://remote/api/v1"),
            ("FTAG_API_KEY", "k"),
            ("FTAG_PORT", "4000"),
        ]
        .into_iter()
        .collect();

        let config =
            Config::default().with_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server_url, "http://remote/api/v1");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let config = Config::default().with_env_overrides(|k| {
            (k == "FTAG_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
