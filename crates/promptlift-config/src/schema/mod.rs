//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Gemini generation endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API root, up to and including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Seconds allowed for establishing the connection. The request itself
    /// is not bounded.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Key taken from the config file. Overrides the stored credential when set.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            connect_timeout_seconds: default_connect_timeout(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

/// Browser (Chrome DevTools) connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging HTTP endpoint.
    #[serde(default = "default_debug_endpoint")]
    pub debug_endpoint: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_endpoint: default_debug_endpoint(),
        }
    }
}

fn default_debug_endpoint() -> String {
    "http://localhost:9222".to_string()
}

/// Key-value storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file path. Defaults to `~/.promptlift/storage.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
