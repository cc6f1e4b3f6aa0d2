//! Change notification fired after programmatic writes.
//!
//! Host pages only enable their submit controls after seeing an input
//! event, so every write is followed by the signal configured for its site.

use serde::{Deserialize, Serialize};

use promptlift_protocols::PageError;

use crate::document::{Document, DomEvent, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeSignal {
    /// Fire nothing.
    None,
    /// A standard `input` event.
    InputEvent { bubbles: bool, cancelable: bool },
    /// Some other named event.
    Event { name: String, bubbles: bool },
}

impl Default for ChangeSignal {
    fn default() -> Self {
        Self::input()
    }
}

impl ChangeSignal {
    /// Bubbling, cancelable `input` event.
    pub fn input() -> Self {
        Self::InputEvent {
            bubbles: true,
            cancelable: true,
        }
    }

    /// The event to dispatch, if any.
    pub fn event(&self) -> Option<DomEvent> {
        match self {
            ChangeSignal::None => None,
            ChangeSignal::InputEvent { bubbles, cancelable } => Some(
                DomEvent::new("input")
                    .bubbles(*bubbles)
                    .cancelable(*cancelable),
            ),
            ChangeSignal::Event { name, bubbles } => {
                Some(DomEvent::new(name.clone()).bubbles(*bubbles))
            }
        }
    }

    /// Dispatch at `node`. The node must still be in the document.
    pub fn fire(&self, doc: &mut Document, node: NodeId) -> Result<(), PageError> {
        let Some(event) = self.event() else {
            return Ok(());
        };
        if !doc.is_connected(node) {
            return Err(PageError::WriteRejected(
                "input element was removed before the change event".to_string(),
            ));
        }
        doc.dispatch_event(node, event)
            .map(|_| ())
            .map_err(|e| PageError::WriteRejected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_default_is_bubbling_input() {
        let event = ChangeSignal::default().event().unwrap();
        assert_eq!(event.name, "input");
        assert!(event.bubbles);
        assert!(event.cancelable);
    }

    #[test]
    fn test_none_fires_nothing() {
        let mut doc = Document::new("about:blank");
        let detached = doc.create_element("div");
        assert!(ChangeSignal::None.event().is_none());
        assert!(ChangeSignal::None.fire(&mut doc, detached).is_ok());
    }

    #[test]
    fn test_fire_reaches_listener() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        doc.add_event_listener(el, "change", tx).unwrap();

        let signal = ChangeSignal::Event {
            name: "change".to_string(),
            bubbles: false,
        };
        signal.fire(&mut doc, el).unwrap();
        assert_eq!(rx.try_recv().unwrap().event.name, "change");
    }

    #[test]
    fn test_fire_on_detached_node_is_rejected() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        let err = ChangeSignal::input().fire(&mut doc, el).unwrap_err();
        assert!(matches!(err, PageError::WriteRejected(_)));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(ChangeSignal::input()).unwrap();
        assert_eq!(json["type"], "input_event");
        let parsed: ChangeSignal = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(parsed, ChangeSignal::None);
    }
}
