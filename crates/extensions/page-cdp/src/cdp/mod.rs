//! Minimal Chrome DevTools Protocol client.
//!
//! Just enough of CDP to find a tab, attach to it and evaluate scripts in it.

mod client;
mod error;
mod protocol;
mod session;

pub use client::{CdpClient, DEFAULT_CALL_TIMEOUT};
pub use error::CdpError;
pub use protocol::{BrowserVersion, PageInfo};
pub use session::PageSession;
