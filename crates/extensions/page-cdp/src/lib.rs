//! # promptlift Page (CDP)
//!
//! Drives the prompt input of a real ChatGPT or Gemini tab through Chrome's
//! remote debugging port. Start Chrome with `--remote-debugging-port=9222`.

pub mod cdp;
pub mod page;
pub mod script;
pub mod tabs;

pub use cdp::{CdpClient, CdpError, PageInfo, PageSession};
pub use page::CdpPromptPage;
pub use tabs::select_page;
