//! Prompt text and enhancement request types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The current contents of a site's prompt field.
///
/// Always held trimmed; there is no other normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptText(String);

impl PromptText {
    /// Create prompt text, trimming surrounding whitespace.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromptText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for PromptText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for PromptText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single request to enhance a prompt. Built per user action and consumed
/// by the call that sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    pub prompt_text: PromptText,
}

impl EnhancementRequest {
    pub fn new(prompt_text: impl Into<PromptText>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
        }
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
