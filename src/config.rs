//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{DEFAULT_GENERATE_MODEL, DEFAULT_REPLICATE_MODEL};
use crate::params::AspectRatio;

/// Base URL of the Generative Language API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Model selection per mode.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Default values used when CLI flags are not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Model selection per mode.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model name or alias used by `generate`.
    pub generate: String,
    /// Model name or alias used by `replicate`.
    pub replicate: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            generate: DEFAULT_GENERATE_MODEL.to_string(),
            replicate: DEFAULT_REPLICATE_MODEL.to_string(),
        }
    }
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default aspect ratio for `generate`.
    pub aspect_ratio: AspectRatio,
    /// Directory the download action writes into.
    pub output_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { aspect_ratio: AspectRatio::default(), output_dir: PathBuf::from(".") }
    }
}

/// API endpoint settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_BASE.to_string() }
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
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring `GEMINI_API_KEY`, then `API_KEY`.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.keys.gemini.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `THUMBSMITH_CONFIG` environment variable
/// 3. `~/.config/thumbsmith/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("THUMBSMITH_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/thumbsmith/config.toml")
    } else {
        PathBuf::from("thumbsmith.toml")
    }
}
