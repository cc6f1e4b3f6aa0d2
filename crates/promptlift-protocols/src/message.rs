//! Cross-context message contract between the control surface and the page.
//!
//! Requests are tagged by `action`; responses are untagged and told apart by
//! which field they carry:
//!
//! ```text
//! {"action":"getPrompt"}                          -> {"prompt":"..."} | {"error":"not found"}
//! {"action":"setPrompt","enhancedPrompt":"..."}   -> {"success":true} | {"error":"could not set"}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::types::PromptText;

/// Error string returned when the prompt cannot be read.
pub const NOT_FOUND: &str = "not found";
/// Error string returned when the prompt cannot be written.
pub const COULD_NOT_SET: &str = "could not set";
/// Error string returned for requests the page does not understand.
pub const UNKNOWN_ACTION: &str = "unknown action";

/// Request sent from the control surface to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RelayRequest {
    GetPrompt,
    SetPrompt {
        #[serde(rename = "enhancedPrompt")]
        enhanced_prompt: String,
    },
}

impl RelayRequest {
    pub fn action(&self) -> &'static str {
        match self {
            RelayRequest::GetPrompt => "getPrompt",
            RelayRequest::SetPrompt { .. } => "setPrompt",
        }
    }
}

/// Reply sent from the page back to the control surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Prompt { prompt: String },
    Success { success: bool },
    Error { error: String },
}

impl RelayResponse {
    pub fn prompt(text: impl Into<String>) -> Self {
        RelayResponse::Prompt {
            prompt: text.into(),
        }
    }

    pub fn success() -> Self {
        RelayResponse::Success { success: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        RelayResponse::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RelayResponse::Error { .. })
    }

    /// Interpret this reply as the answer to `getPrompt`.
    pub fn into_prompt(self) -> Result<PromptText, RelayError> {
        match self {
            RelayResponse::Prompt { prompt } => Ok(PromptText::new(prompt)),
            RelayResponse::Error { error } => Err(RelayError::Remote(error)),
            other => Err(RelayError::Protocol(format!(
                "expected a prompt reply, got {:?}",
                other
            ))),
        }
    }

    /// Interpret this reply as the answer to `setPrompt`.
    pub fn into_success(self) -> Result<(), RelayError> {
        match self {
            RelayResponse::Success { success: true } => Ok(()),
            RelayResponse::Success { success: false } => {
                Err(RelayError::Remote(COULD_NOT_SET.to_string()))
            }
            RelayResponse::Error { error } => Err(RelayError::Remote(error)),
            other => Err(RelayError::Protocol(format!(
                "expected a success reply, got {:?}",
                other
            ))),
        }
    }
}

/// Unsolicited notification pushed from the page to the control surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageNotification {
    TextUpdated { text: String },
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
