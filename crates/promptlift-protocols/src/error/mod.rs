//! Error types for the promptlift protocol layer.

mod enhance;
mod page;
mod relay;

pub use enhance::*;
pub use page::*;
pub use relay::*;
