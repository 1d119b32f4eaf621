//! Configuration file management.
//!
//! The API key is a secret supplied by the hosting environment: either the
//! `GEMINI_API_KEY` environment variable or `~/.config/tutor/secret.json`.
//! Model name and request timeout live in the non-secret
//! `~/.config/tutor/config.toml`. A missing or empty key is a startup-fatal
//! condition, not a runtime error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TutorError};

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default bounded timeout for gateway requests, in seconds. There is no
/// retry; a timed-out call surfaces as a model-unavailable error.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_KEY: &str = "GEMINI_API_KEY";

/// Root structure of secret.json.
#[derive(Debug, Clone, Deserialize)]
struct SecretConfig {
    #[serde(default)]
    gemini: Option<GeminiSecret>,
}

/// Gemini API secret section.
#[derive(Debug, Clone, Deserialize)]
struct GeminiSecret {
    api_key: String,
    #[serde(default)]
    model_name: Option<String>,
}

/// Root structure of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// API key for the hosted model service.
    pub api_key: String,
    /// Model name used for both text and vision calls.
    pub model: String,
    /// Request timeout applied to every gateway call.
    pub timeout_secs: u64,
}

impl TutorConfig {
    /// Loads configuration from the environment and `~/.config/tutor/`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when no API key can be found, or when a
    /// present config file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let dir = default_config_dir()?;
        Self::load_from(&dir, env::var(ENV_API_KEY).ok())
    }

    fn load_from(dir: &Path, env_api_key: Option<String>) -> Result<Self> {
        let secret = load_secret(&dir.join("secret.json"))?;
        let settings = load_settings(&dir.join("config.toml"))?;

        let api_key = env_api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| secret.as_ref().map(|s| s.api_key.clone()))
            .ok_or_else(|| {
                TutorError::config(format!(
                    "no API key found: set {} or add a gemini section to {}",
                    ENV_API_KEY,
                    dir.join("secret.json").display()
                ))
            })?;
        if api_key.trim().is_empty() {
            return Err(TutorError::config("API key must not be empty"));
        }

        let model = settings
            .model
            .or_else(|| secret.and_then(|s| s.model_name))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            model,
            timeout_secs: settings
                .request_timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Loads the gemini section of secret.json, if the file exists.
fn load_secret(path: &Path) -> Result<Option<GeminiSecret>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| TutorError::config(format!("failed to read {}: {}", path.display(), e)))?;
    let secret: SecretConfig = serde_json::from_str(&content)
        .map_err(|e| TutorError::config(format!("failed to parse {}: {}", path.display(), e)))?;

    Ok(secret.gemini)
}

/// Loads config.toml, falling back to defaults when the file is absent.
fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| TutorError::config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| TutorError::config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Returns the configuration directory: ~/.config/tutor
fn default_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TutorError::config("could not determine home directory"))?;
    Ok(home.join(".config").join("tutor"))
}
