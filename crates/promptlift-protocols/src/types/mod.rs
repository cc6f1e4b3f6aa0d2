//! Common types used across the promptlift workspace.

mod credential;
mod prompt;

pub use credential::*;
pub use prompt::*;
