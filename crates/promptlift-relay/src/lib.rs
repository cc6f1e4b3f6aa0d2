//! # promptlift Relay
//!
//! Request/response bridge between the control surface and a page.
//!
//! ```text
//! ControlSurface --RelayClient--> [ JSON + oneshot reply ] --RelayReceiver--> ContentScript --> PromptPage
//!        ^                                                                          |
//!        +-------------------------- Notifications (textUpdated) <------------------+
//! ```

pub mod clipboard;
pub mod content_script;
pub mod control;
pub mod error;
pub mod transport;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use content_script::{forward_updates, ContentScript};
pub use control::{ControlSurface, ImportOutcome};
pub use error::ControlError;
pub use transport::{channel, Envelope, Notifications, Notifier, RelayClient, RelayReceiver};
