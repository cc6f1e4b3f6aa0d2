//! Control surface errors.

use thiserror::Error;

use promptlift_config::ConfigError;
use promptlift_protocols::{EnhanceError, PageError, RelayError};

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Enhance(#[from] EnhanceError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("No prompt has been imported")]
    NothingImported,

    #[error("No enhanced prompt available")]
    NothingEnhanced,

    #[error("Credential error: {0}")]
    Credential(#[from] ConfigError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl ControlError {
    /// Message shown to the user when the action fails.
    pub fn user_message(&self) -> String {
        match self {
            ControlError::Page(PageError::SiteUnsupported(_)) => {
                "Please navigate to ChatGPT or Google Gemini to import a prompt".to_string()
            }
            ControlError::Page(e) => e.to_string(),
            ControlError::Enhance(EnhanceError::MissingCredential) => {
                "Please enter your Gemini API key first".to_string()
            }
            ControlError::Enhance(e) => format!("Error enhancing prompt: {}", e),
            ControlError::Relay(RelayError::Remote(message)) => message.clone(),
            ControlError::Relay(e) => {
                format!("Error talking to the page. Make sure you are on a supported site ({})", e)
            }
            ControlError::NothingImported => "Please import a prompt first".to_string(),
            ControlError::NothingEnhanced => "Please enhance a prompt first".to_string(),
            ControlError::Credential(ConfigError::InvalidValue { message, .. }) => message.clone(),
            ControlError::Credential(e) => e.to_string(),
            ControlError::Clipboard(_) => "Failed to copy text to clipboard".to_string(),
        }
    }
}
