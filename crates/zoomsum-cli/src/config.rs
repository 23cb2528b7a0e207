//! Application configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/zoomsum/config.toml` by default.
//!
//! Credential values are either plain text or an `env::VAR` reference that
//! is read from the environment at startup; values left empty fall back to
//! the `ZOOM_ACCOUNT_ID`, `ZOOM_CLIENT_ID` and `ZOOM_CLIENT_SECRET`
//! environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use zoomsum_zoom::ZoomCredentials;

/// Configuration for the zoomsum CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Zoom app settings.
    pub zoom: ZoomSettings,

    /// Log sink settings.
    pub log: LogSettings,
}

/// Zoom server-to-server app settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// Account id of the server-to-server app.
    pub account_id: String,

    /// App client id.
    pub client_id: String,

    /// App client secret.
    pub client_secret: String,

    /// User whose meetings are listed. Defaults to the app owner.
    pub user: Option<String>,

    /// Persist the access token between runs.
    pub cache_token: bool,

    /// Where the persisted token lives. Defaults to the data directory.
    pub token_cache_path: Option<PathBuf>,
}

impl ZoomSettings {
    /// Resolves the configured credentials into concrete values.
    ///
    /// Each field may be plain text or an `env::VAR` reference; empty
    /// fields fall back to the corresponding `ZOOM_*` environment variable.
    pub fn credentials(&self) -> Result<ZoomCredentials, String> {
        let credentials = ZoomCredentials::new(
            resolve_credential(&self.account_id, "ZOOM_ACCOUNT_ID")?,
            resolve_credential(&self.client_id, "ZOOM_CLIENT_ID")?,
            resolve_credential(&self.client_secret, "ZOOM_CLIENT_SECRET")?,
        );
        credentials.validate().map_err(|e| e.to_string())?;
        Ok(credentials)
    }
}

fn resolve_credential(value: &str, fallback_var: &str) -> Result<String, String> {
    if value.is_empty() {
        return std::env::var(fallback_var).map_err(|_| {
            format!(
                "missing credential: set it in config.toml or ${}",
                fallback_var
            )
        });
    }
    match value.strip_prefix("env::") {
        Some(var) => {
            std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
        }
        None => Ok(value.to_string()),
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file path. Defaults to zoomsum_<timestamp>.log in the working
    /// directory.
    pub file: Option<PathBuf>,

    /// Disable the log file entirely.
    pub disabled: bool,
}

impl AppConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("failed to read config: {}", e))?;
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zoomsum")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zoomsum")
    }

    /// Returns the default on-disk token cache path.
    pub fn default_token_cache_path() -> PathBuf {
        Self::default_data_dir().join("tokens.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [zoom]
            account_id = "acc-1"
            client_id = "client-1"
            client_secret = "env::_ZOOMSUM_CFG_TEST_SECRET"
            user = "alice@example.com"
            cache_token = true

            [log]
            disabled = true
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.zoom.account_id, "acc-1");
        assert_eq!(config.zoom.user.as_deref(), Some("alice@example.com"));
        assert!(config.zoom.cache_token);
        assert!(config.log.disabled);
    }

    #[test]
    fn empty_config_is_valid() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.zoom.account_id.is_empty());
        assert!(!config.zoom.cache_token);
        assert!(!config.log.disabled);
    }

    #[test]
    fn credentials_resolve_env_references() {
        unsafe {
            std::env::set_var("_ZOOMSUM_CFG_TEST_SECRET", "resolved-secret");
        }
        let settings = ZoomSettings {
            account_id: "acc-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "env::_ZOOMSUM_CFG_TEST_SECRET".to_string(),
            ..Default::default()
        };

        let credentials = settings.credentials().unwrap();
        assert_eq!(credentials.account_id, "acc-1");
        assert_eq!(credentials.client_secret, "resolved-secret");
        unsafe {
            std::env::remove_var("_ZOOMSUM_CFG_TEST_SECRET");
        }
    }

    #[test]
    fn env_reference_to_missing_variable_errors() {
        let err = resolve_credential("env::_ZOOMSUM_NONEXISTENT_VAR_12345", "ZOOM_ACCOUNT_ID")
            .unwrap_err();
        assert!(err.contains("_ZOOMSUM_NONEXISTENT_VAR_12345"));
        assert!(err.contains("not set"));
    }

    #[test]
    fn plain_credential_passes_through() {
        assert_eq!(
            resolve_credential("AbCdEf123456", "ZOOM_ACCOUNT_ID").unwrap(),
            "AbCdEf123456"
        );
    }

    #[test]
    fn missing_credentials_error_names_the_variable() {
        let settings = ZoomSettings::default();
        let err = settings.credentials().unwrap_err();
        assert!(err.contains("ZOOM_ACCOUNT_ID"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[zoom]\naccount_id = \"acc-file\"").unwrap();

        let config = AppConfig::load_from(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.zoom.account_id, "acc-file");
    }

    #[test]
    fn default_paths_are_scoped() {
        assert!(AppConfig::default_path().to_string_lossy().contains("zoomsum"));
        assert!(
            AppConfig::default_token_cache_path()
                .to_string_lossy()
                .contains("zoomsum")
        );
    }
}
