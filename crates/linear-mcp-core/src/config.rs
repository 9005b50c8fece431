//! Configuration management for linear-mcp.
//!
//! Two sources feed the server:
//!
//! - **Credentials**: the `LINEAR_API_KEY` environment variable, optionally
//!   populated from a dotenv file. By default the file is `.env` one
//!   directory above the directory holding the executable.
//! - **Settings**: an optional TOML file in the platform config directory:
//!   - **macOS/Linux**: `~/.config/linear-mcp/config.toml`
//!   - **Windows**: `%APPDATA%\linear-mcp\config.toml`
//!
//! # Example
//!
//! ```ignore
//! use linear_mcp_core::config::{load_dotenv, Config, Credentials};
//!
//! load_dotenv(None);
//! let config = Config::load()?.with_env_overrides();
//! let credentials = Credentials::from_env()?;
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "LINEAR_API_KEY";

/// Environment variable overriding the GraphQL endpoint.
pub const API_URL_VAR: &str = "LINEAR_API_URL";

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "linear-mcp";

/// Dotenv file name.
const ENV_FILE_NAME: &str = ".env";

// =============================================================================
// Credentials
// =============================================================================

/// API credential for the upstream service.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Wrap an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the credential from the process environment.
    ///
    /// Fails immediately when `LINEAR_API_KEY` is absent or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the credential through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match lookup(API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(Error::Config(format!(
                "{} is not set. Export it or add it to the .env file",
                API_KEY_VAR
            ))),
        }
    }

    /// The raw API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Dotenv
// =============================================================================

/// Default dotenv location: `.env` one directory above the executable's directory.
pub fn default_env_file() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe_dir = exe.parent()?;
    Some(exe_dir.parent().unwrap_or(exe_dir).join(ENV_FILE_NAME))
}

/// Load variables from a dotenv file into the process environment.
///
/// Variables already present in the environment are left untouched.
/// Returns the path that was loaded, if any. A missing file is not an error;
/// a malformed one is logged and skipped.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_env_file()?,
    };

    if !path.exists() {
        debug!(path = ?path, "No dotenv file found");
        return None;
    }

    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!(path = ?path, "Loaded dotenv file");
            Some(path)
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "Failed to load dotenv file");
            None
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Linear API settings
    #[serde(default)]
    pub linear: LinearConfig,

    /// MCP server identity
    #[serde(default)]
    pub server: ServerConfig,
}

/// Linear API settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// GraphQL endpoint (defaults to the public Linear API)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Server identity reported at `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
    #[serde(default = "default_server_version")]
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_server_version(),
        }
    }
}

fn default_server_name() -> String {
    "linear".to_string()
}

fn default_server_version() -> String {
    "1.0.0".to_string()
}

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// Returns a default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides through an arbitrary variable lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.trim().is_empty()) {
            debug!(url = %url, "Using API URL from environment");
            self.linear.api_url = Some(url);
        }
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
