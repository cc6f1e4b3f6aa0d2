//! System clipboard seam.

/// Somewhere to put copied text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// Clipboard that just remembers the last copied text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
