//! TOML-based application configuration.
//!
//! Stores verifier settings (models, endpoint, timeout, fast-path
//! threshold) at `~/.config/taskproof/config.toml`. Every field has a
//! default so a missing or partial file always loads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::proof::FAST_PATH_MIN_CHARS;

/// AI verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model for text-only classification.
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model for image-bearing classification.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    /// Request timeout; expiry counts as a verification failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum trimmed text length for the fast-path auto-approval.
    #[serde(default = "default_fast_path_min_chars")]
    pub fast_path_min_chars: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            timeout_secs: default_timeout_secs(),
            fast_path_min_chars: default_fast_path_min_chars(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fast_path_min_chars() -> usize {
    FAST_PATH_MIN_CHARS
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub verifier: VerifierConfig,
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load configuration, falling back to defaults when the file is
    /// missing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Persist configuration as TOML.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a configuration value by dotted key.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "verifier.api_base" => Ok(self.verifier.api_base.clone()),
            "verifier.text_model" => Ok(self.verifier.text_model.clone()),
            "verifier.vision_model" => Ok(self.verifier.vision_model.clone()),
            "verifier.timeout_secs" => Ok(self.verifier.timeout_secs.to_string()),
            "verifier.fast_path_min_chars" => Ok(self.verifier.fast_path_min_chars.to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Set a configuration value by dotted key.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        match key {
            "verifier.api_base" => self.verifier.api_base = value.to_string(),
            "verifier.text_model" => self.verifier.text_model = value.to_string(),
            "verifier.vision_model" => self.verifier.vision_model = value.to_string(),
            "verifier.timeout_secs" => {
                self.verifier.timeout_secs =
                    value.parse().map_err(|_| invalid("expected seconds"))?;
            }
            "verifier.fast_path_min_chars" => {
                self.verifier.fast_path_min_chars =
                    value.parse().map_err(|_| invalid("expected a character count"))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
