//! Page protocol definitions.
//!
//! A [`PromptPage`] is whatever sits on the far side of the relay: an
//! in-memory document, or a live browser tab driven over CDP. It resolves the
//! site adapter for its own URL and performs reads and writes through it.

use async_trait::async_trait;

use crate::error::PageError;
use crate::types::PromptText;

/// A page holding a chat prompt input.
#[async_trait]
pub trait PromptPage: Send + Sync {
    /// The page's current location.
    async fn url(&self) -> String;

    /// Read the current prompt text.
    ///
    /// Fails with [`PageError::SiteUnsupported`] when no adapter matches the
    /// URL and [`PageError::ElementNotFound`] when the input is not rendered.
    async fn read_prompt(&self) -> Result<PromptText, PageError>;

    /// Replace the prompt text and fire the site's change signal.
    async fn write_prompt(&self, text: &str) -> Result<(), PageError>;
}
