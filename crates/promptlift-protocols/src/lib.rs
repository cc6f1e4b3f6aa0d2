//! # promptlift Protocols
//!
//! Shared definitions for the promptlift workspace.
//! Contains types, wire messages and trait seams - no implementations.
//!
//! ## Core Traits
//!
//! - [`PromptPage`] - A page that can hand out and accept prompt text
//! - [`PromptEnhancer`] - A remote service that rewrites a prompt

pub mod enhancer;
pub mod error;
pub mod message;
pub mod page;
pub mod types;

pub use enhancer::PromptEnhancer;
pub use error::{EnhanceError, PageError, RelayError};
pub use message::{PageNotification, RelayRequest, RelayResponse};
pub use page::PromptPage;
pub use types::*;
