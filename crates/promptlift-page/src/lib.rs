//! # promptlift Page
//!
//! Everything that happens on the page side of the relay.
//!
//! - [`document`]: in-memory element tree with mutation delivery and events
//! - [`SiteAdapter`]: where each supported site keeps its prompt input
//! - [`ChangeSignal`]: the event fired after a programmatic write
//! - [`PromptObserver`]: republishes prompt text changes
//! - [`DocumentPage`]: [`promptlift_protocols::PromptPage`] over a document

pub mod adapter;
pub mod document;
pub mod fixtures;
pub mod observer;
pub mod page;
pub mod registry;
pub mod signal;

pub use adapter::{Locator, SiteAdapter, WriteStyle};
pub use document::{Document, DomError, NodeId};
pub use observer::{
    AttachOutcome, ChangeFilter, ObserverHandle, ObserverState, PromptObserver, TextUpdated,
};
pub use page::{shared, DocumentPage, SharedDocument};
pub use registry::{RegisteredSite, SiteRegistry};
pub use signal::ChangeSignal;
