//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Name of the per-user directory holding config, storage and logs.
const APP_DIR: &str = ".promptlift";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name).map_err(|_| {
                ConfigError::EnvVarNotSet(var_name.to_string())
            })?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }

    /// The per-user application directory (`~/.promptlift`).
    pub fn app_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Default config file location (`~/.promptlift/config.toml`).
    pub fn default_config_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.promptlift");
        assert!(!expanded.starts_with('~'));
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [gemini]
            base_url = "http://127.0.0.1:9000/v1beta"
            model = "gemini-1.5-pro"
            connect_timeout_seconds = 3

            [browser]
            debug_endpoint = "http://127.0.0.1:9333"

            [storage]
            path = "/tmp/promptlift-storage.json"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.gemini.base_url, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.connect_timeout_seconds, 3);
        assert_eq!(config.browser.debug_endpoint, "http://127.0.0.1:9333");
        assert_eq!(
            config.storage.path.as_deref(),
            Some(Path::new("/tmp/promptlift-storage.json"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[gemini]").unwrap();
        writeln!(file, "model = \"gemini-1.5-flash\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.browser.debug_endpoint, "http://localhost:9222");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PROMPTLIFT_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${PROMPTLIFT_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("test_value"));
        unsafe {
            std::env::remove_var("PROMPTLIFT_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_api_key_from_env() {
        // SAFETY: unique test-only env var
        unsafe {
            std::env::set_var("PROMPTLIFT_TEST_KEY", "AIzaTest");
        }
        let content = r#"
            [gemini]
            api_key = "${PROMPTLIFT_TEST_KEY}"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("AIzaTest"));
        unsafe {
            std::env::remove_var("PROMPTLIFT_TEST_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }

    #[test]
    fn test_default_config_path() {
        let path = ConfigLoader::default_config_path();
        assert!(path.ends_with(".promptlift/config.toml"));
    }
}
