//! Page adapter errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// The current page URL matches no registered site.
    #[error("Site not supported: {0}")]
    SiteUnsupported(String),

    /// The site is known but its prompt input is not in the document (yet).
    #[error("Prompt input field not found on {0}")]
    ElementNotFound(String),

    /// The input was found but the write or its change signal failed.
    #[error("Could not set prompt text: {0}")]
    WriteRejected(String),
}

impl PageError {
    /// Whether the page may simply not have finished rendering.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, PageError::ElementNotFound(_))
    }
}
