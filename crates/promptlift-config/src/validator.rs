//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_gemini(config, &mut result);
        Self::validate_browser(config, &mut result);

        Ok(result)
    }

    fn validate_gemini(config: &Config, result: &mut ValidationResult) {
        let gemini = &config.gemini;

        if !is_http_url(&gemini.base_url) {
            result.add_error(ValidationError::new(
                "gemini.base_url",
                "base_url must start with http:// or https://",
            ));
        } else if gemini.base_url.starts_with("http://") {
            result.add_warning(ValidationWarning::new(
                "gemini.base_url",
                "base_url is not https; the API key is sent in the query string",
            ));
        }

        if gemini.model.trim().is_empty() {
            result.add_error(ValidationError::new("gemini.model", "model cannot be empty"));
        }

        if gemini.connect_timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "gemini.connect_timeout_seconds",
                "connect_timeout_seconds must be greater than 0",
            ));
        }

        if let Some(key) = &gemini.api_key {
            if key.trim().is_empty() {
                result.add_warning(ValidationWarning::new(
                    "gemini.api_key",
                    "api_key is blank and will be ignored",
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if !is_http_url(&config.browser.debug_endpoint) {
            result.add_error(ValidationError::new(
                "browser.debug_endpoint",
                "debug_endpoint must start with http:// or https://",
            ));
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
