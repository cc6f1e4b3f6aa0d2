use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::NodeId;

/// A synthetic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomEvent {
    pub name: String,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl DomEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bubbles: false,
            cancelable: false,
        }
    }

    pub fn bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }
}

/// An event as seen by one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub current_target: NodeId,
    pub event: DomEvent,
}

pub(crate) struct Listener {
    pub node: NodeId,
    pub name: String,
    pub sender: mpsc::UnboundedSender<DispatchedEvent>,
}
