//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::live::openai::OPENAI_API_BASE;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Default parameter values, used when the matching CLI flag is absent.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// `OpenAI` API key.
    pub openai: Option<String>,
}

/// API endpoint settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root; defaults to the public `OpenAI` endpoint.
    pub base_url: Option<String>,
    /// Organization sent as `OpenAI-Organization`.
    pub organization: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            organization: None,
            timeout_secs: 120,
        }
    }
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default image size.
    pub size: String,
    /// Default response format.
    pub response_format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            response_format: "url".to_string(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"warn"` or `"imagen_openai=debug"`.
    pub level: String,
    /// `"text"` or `"json"`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the `OpenAI` API key, preferring `OPENAI_API_KEY`.
    #[must_use]
    pub fn openai_key(&self) -> Option<String> {
        env_override("OPENAI_API_KEY").or_else(|| self.keys.openai.clone())
    }

    /// API root, preferring `OPENAI_BASE_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        env_override("OPENAI_BASE_URL")
            .or_else(|| self.api.base_url.clone())
            .unwrap_or_else(|| OPENAI_API_BASE.to_string())
    }

    /// Organization, preferring `OPENAI_ORG_ID`.
    #[must_use]
    pub fn organization(&self) -> Option<String> {
        env_override("OPENAI_ORG_ID").or_else(|| self.api.organization.clone())
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

/// A non-empty environment variable value.
fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `IMAGEN_CONFIG` environment variable
/// 3. `~/.config/imagen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("IMAGEN_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/imagen/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/imagen/config.toml")
    } else {
        PathBuf::from("imagen.toml")
    }
}
