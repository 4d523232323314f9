//! # Client Configuration
//!
//! Where the backend lives, how long to wait for it, and where the session
//! token is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAFE_API_URL=https://cafe.example.com/api                          │
//! │     CAFE_TIMEOUT_SECS=10                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/catalog/client.toml (Linux)                              │
//! │     ~/Library/Application Support/com.cafe.catalog/client.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/api, 30 s, 50 products                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "https://cafe.example.com/api"
//! timeout_secs = 30
//! products_limit = 50
//!
//! [session]
//! token_key = "token"
//! validate_without_token = true
//!
//! [storage]
//! database_path = "/var/lib/cafe/cafe.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use cafe_core::{PRODUCTS_PAGE_LIMIT, TOKEN_STORAGE_KEY};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DATABASE_FILE: &str = "cafe.db";

// =============================================================================
// API Settings
// =============================================================================

/// REST backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    /// Default: 30
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `limite` query value for catalog loads.
    /// Default: 50
    #[serde(default = "default_products_limit")]
    pub products_limit: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_products_limit() -> u32 {
    PRODUCTS_PAGE_LIMIT
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            products_limit: default_products_limit(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Session manager behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Key the token is persisted under.
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Whether `check_token` still calls `GET /auth` when no token is stored.
    ///
    /// The session is marked not-authenticated first either way.
    #[serde(default = "default_true")]
    pub validate_without_token: bool,
}

fn default_token_key() -> String {
    TOKEN_STORAGE_KEY.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            token_key: default_token_key(),
            validate_without_token: true,
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file for the token store. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults pointed at a specific backend. Handy for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.products_limit == 0 {
            return Err(ClientError::InvalidConfig(
                "products_limit must be greater than 0".into(),
            ));
        }

        if self.session.token_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig("token_key must not be empty".into()));
        }

        Ok(())
    }

    /// Parsed base URL. Only http and https are accepted.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.api.base_url)?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "API URL must use http or https, got: {}",
                other
            ))),
        }
    }

    /// SQLite path for the token store.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "cafe", "catalog")
                    .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            })
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CAFE_*` overrides from `lookup`. Unparseable values are skipped.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CAFE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("CAFE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid CAFE_TIMEOUT_SECS"),
            }
        }

        if let Some(limit) = lookup("CAFE_PRODUCTS_LIMIT") {
            match limit.parse::<u32>() {
                Ok(l) => self.api.products_limit = l,
                Err(_) => warn!(value = %limit, "Ignoring invalid CAFE_PRODUCTS_LIMIT"),
            }
        }

        if let Some(path) = lookup("CAFE_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("CAFE_VALIDATE_WITHOUT_TOKEN") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.session.validate_without_token = true,
                "0" | "false" | "no" => self.session.validate_without_token = false,
                _ => warn!(value = %flag, "Ignoring invalid CAFE_VALIDATE_WITHOUT_TOKEN"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cafe", "catalog")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.products_limit, 50);
        assert_eq!(config.session.token_key, "token");
        assert!(config.session.validate_without_token);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "not a url".into();
        assert!(config.validate().unwrap_err().is_config_error());

        config.api.base_url = "ftp://cafe.example.com".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://cafe.example.com/api".into();
        config.api.products_limit = 0;
        assert!(config.validate().is_err());

        config.api.products_limit = 10;
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CAFE_API_URL", "https://cafe.example.com/api"),
            ("CAFE_TIMEOUT_SECS", "5"),
            ("CAFE_PRODUCTS_LIMIT", "not-a-number"),
            ("CAFE_DB_PATH", "/tmp/cafe.db"),
            ("CAFE_VALIDATE_WITHOUT_TOKEN", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://cafe.example.com/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.products_limit, 50);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/cafe.db"));
        assert!(!config.session.validate_without_token);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://cafe.example.com/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.token_key, "token");
        assert_eq!(config.storage.database_path, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");

        let mut config = ClientConfig::with_base_url("https://cafe.example.com/api");
        config.api.products_limit = 20;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("[session]"));

        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }
}
