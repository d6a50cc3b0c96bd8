//! Server configuration.
//!
//! Loaded from `~/.config/gsuite-mcp/config.toml`; every field has a
//! default so a missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gsuite_mcp_providers::google::{GoogleConfig, OAuthCredentials};

use crate::error::{ServerError, ServerResult};

/// Configuration for the gsuite-mcp server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Path to the Google OAuth credentials JSON file.
    ///
    /// Defaults to `~/.config/gsuite-mcp/credentials.json`.
    pub credentials_path: PathBuf,

    /// Path to store OAuth tokens.
    pub token_path: PathBuf,

    /// Calendar to operate on.
    pub calendar_id: String,

    /// Default work hours for free-slot filtering (start inclusive,
    /// end exclusive).
    pub work_start_hour: u32,
    pub work_end_hour: u32,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Port range for the loopback OAuth redirect server.
    pub oauth_port_start: u16,
    pub oauth_port_end: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            credentials_path: Self::default_credentials_path(),
            token_path: GoogleConfig::default_token_path(),
            calendar_id: "primary".to_string(),
            work_start_hour: 9,
            work_end_hour: 17,
            timeout_secs: GoogleConfig::DEFAULT_TIMEOUT_SECS,
            oauth_port_start: 8080,
            oauth_port_end: 8090,
        }
    }
}

impl ServerConfig {
    /// Returns the default config file path.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Returns the default credentials file path.
    pub fn default_credentials_path() -> PathBuf {
        config_dir().join("credentials.json")
    }

    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist; without one, a missing
    /// default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::load_from(&default)
                } else {
                    debug!("no config file at {:?}, using defaults", default);
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> ServerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ServerError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        debug!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Validates cross-field constraints.
    pub fn validate(&self) -> ServerResult<()> {
        if self.work_start_hour >= self.work_end_hour || self.work_end_hour > 24 {
            return Err(ServerError::config(format!(
                "work hours {}..{} are invalid",
                self.work_start_hour, self.work_end_hour
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ServerError::config("timeout_secs must be positive"));
        }
        if self.oauth_port_start > self.oauth_port_end {
            return Err(ServerError::config("invalid OAuth port range"));
        }
        Ok(())
    }

    /// Returns the HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the Google provider configuration, reading the credentials
    /// file.
    pub fn google_config(&self) -> ServerResult<GoogleConfig> {
        let credentials = OAuthCredentials::from_file(&self.credentials_path)?;
        Ok(GoogleConfig::new(credentials)
            .with_token_path(&self.token_path)
            .with_timeout(self.timeout())
            .with_loopback_port_range(self.oauth_port_start, self.oauth_port_end))
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ServerError::config(format!("failed to serialize config: {}", e)))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".config"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gsuite-mcp")
}
