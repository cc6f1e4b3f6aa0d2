//! System clipboard.

use arboard::Clipboard;

/// The desktop clipboard.
pub(crate) struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub(crate) fn new() -> Result<Self, arboard::Error> {
        Ok(Self {
            clipboard: Clipboard::new()?,
        })
    }
}

impl promptlift_relay::Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        self.clipboard.set_text(text).map_err(|e| e.to_string())
    }
}
