//! In-memory document model.
//!
//! A small arena-backed element tree with exactly the surface the prompt
//! adapters and the change observer need: id and attribute lookup, text
//! content, child-list and character-data mutation, synthetic event dispatch,
//! and mutation delivery to registered observers over channels.
//!
//! Nodes are never freed. A removed node keeps its id and subtree but is no
//! longer connected to the document root.

mod event;
mod mutation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

pub use event::{DispatchedEvent, DomEvent};
pub use mutation::{MutationBatch, MutationKind, MutationRecord, ObserveOptions, ObserverId};

use event::Listener;
use mutation::Registration;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Document model errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Node {0:?} does not exist")]
    NodeNotFound(NodeId),

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0:?} is not a text node")]
    NotText(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A page document: `<html><body>...</body></html>` plus a location.
pub struct Document {
    url: String,
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    registrations: Vec<Registration>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.nodes.len())
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

impl Document {
    /// Create an empty document at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        let mut doc = Self {
            url: url.into(),
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            registrations: Vec::new(),
            listeners: Vec::new(),
        };
        let root = doc.push_node(NodeData::Element {
            tag: "html".to_string(),
            attributes: BTreeMap::new(),
        });
        let body = doc.push_node(NodeData::Element {
            tag: "body".to_string(),
            attributes: BTreeMap::new(),
        });
        doc.nodes[body.0].parent = Some(root);
        doc.nodes[root.0].children.push(body);
        doc.root = root;
        doc.body = body;
        doc
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Navigate without reloading (history push); the tree is kept.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    // ========================================================================
    // Creation and inspection
    // ========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.push_node(NodeData::Text(data.to_string()))
    }

    pub fn data(&self, id: NodeId) -> Result<&NodeData, DomError> {
        Ok(&self.node(id)?.data)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id), Ok(NodeData::Element { .. }))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            Ok(NodeData::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.data(id) {
            Ok(NodeData::Element { attributes, .. }) => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    /// Concatenated text of all descendant text nodes, in tree order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Connected nodes in tree (pre-)order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// First connected element matching `predicate`, in tree order.
    pub fn find_element<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&str, &BTreeMap<String, String>) -> bool,
    {
        self.descendants().into_iter().find(|id| match &self.nodes[id.0].data {
            NodeData::Element { tag, attributes } => predicate(tag, attributes),
            NodeData::Text(_) => false,
        })
    }

    /// `document.getElementById`.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.find_element(|_, attrs| attrs.get("id").map(String::as_str) == Some(element_id))
    }

    /// `document.querySelector('tag[name="value"]')`; `tag` of `None` matches any element.
    pub fn query_attribute(&self, tag: Option<&str>, name: &str, value: &str) -> Option<NodeId> {
        self.find_element(|t, attrs| {
            tag.is_none_or(|wanted| wanted.eq_ignore_ascii_case(t))
                && attrs.get(name).map(String::as_str) == Some(value)
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let old_value = match &mut self.node_mut(id)?.data {
            NodeData::Element { attributes, .. } => {
                attributes.insert(name.to_string(), value.to_string())
            }
            NodeData::Text(_) => return Err(DomError::NotAnElement(id)),
        };
        self.deliver(vec![MutationRecord {
            target: id,
            kind: MutationKind::Attributes {
                name: name.to_string(),
                old_value,
            },
        }]);
        Ok(())
    }

    /// Append `child` to `parent`, moving it out of its current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.is_element(parent) {
            self.node(parent)?;
            return Err(DomError::NotAnElement(parent));
        }
        self.node(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest(
                "cannot insert a node into its own subtree".to_string(),
            ));
        }

        let mut records = Vec::new();
        if let Some(old_parent) = self.detach(child) {
            records.push(MutationRecord {
                target: old_parent,
                kind: MutationKind::ChildList {
                    added: Vec::new(),
                    removed: vec![child],
                },
            });
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        records.push(MutationRecord {
            target: parent,
            kind: MutationKind::ChildList {
                added: vec![child],
                removed: Vec::new(),
            },
        });
        self.deliver(records);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::HierarchyRequest(format!(
                "{:?} is not a child of {:?}",
                child, parent
            )));
        }
        self.detach(child);
        self.deliver(vec![MutationRecord {
            target: parent,
            kind: MutationKind::ChildList {
                added: Vec::new(),
                removed: vec![child],
            },
        }]);
        Ok(())
    }

    /// Replace all children of `parent` with `new_children` in one mutation.
    pub fn replace_children(
        &mut self,
        parent: NodeId,
        new_children: Vec<NodeId>,
    ) -> Result<(), DomError> {
        if !self.is_element(parent) {
            self.node(parent)?;
            return Err(DomError::NotAnElement(parent));
        }
        for child in &new_children {
            self.node(*child)?;
            if *child == parent || self.is_ancestor(*child, parent) {
                return Err(DomError::HierarchyRequest(
                    "cannot insert a node into its own subtree".to_string(),
                ));
            }
        }

        let removed = std::mem::take(&mut self.nodes[parent.0].children);
        for old in &removed {
            self.nodes[old.0].parent = None;
        }
        let mut records = Vec::new();
        for child in &new_children {
            if let Some(old_parent) = self.detach(*child) {
                records.push(MutationRecord {
                    target: old_parent,
                    kind: MutationKind::ChildList {
                        added: Vec::new(),
                        removed: vec![*child],
                    },
                });
            }
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children = new_children.clone();

        if !removed.is_empty() || !new_children.is_empty() {
            records.push(MutationRecord {
                target: parent,
                kind: MutationKind::ChildList {
                    added: new_children,
                    removed,
                },
            });
        }
        self.deliver(records);
        Ok(())
    }

    /// `node.textContent = text`.
    ///
    /// On an element this replaces all children with a single text node (none
    /// when `text` is empty); on a text node it sets the character data.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        match self.data(id)? {
            NodeData::Text(_) => self.set_character_data(id, text),
            NodeData::Element { .. } => {
                let children = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![self.create_text(text)]
                };
                self.replace_children(id, children)
            }
        }
    }

    /// Change the data of a text node.
    pub fn set_character_data(&mut self, id: NodeId, data: &str) -> Result<(), DomError> {
        let old_value = match &mut self.node_mut(id)?.data {
            NodeData::Text(current) => std::mem::replace(current, data.to_string()),
            NodeData::Element { .. } => return Err(DomError::NotText(id)),
        };
        self.deliver(vec![MutationRecord {
            target: id,
            kind: MutationKind::CharacterData { old_value },
        }]);
        Ok(())
    }

    /// Unlink `id` from its parent without recording. Returns the old parent.
    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id.0].parent.take()?;
        self.nodes[parent.0].children.retain(|c| *c != id);
        Some(parent)
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Register `observer` for mutations at `target`.
    ///
    /// Observing the same target again with the same observer replaces the
    /// earlier options instead of adding a second registration.
    pub fn observe(
        &mut self,
        observer: ObserverId,
        target: NodeId,
        options: ObserveOptions,
        sender: mpsc::UnboundedSender<MutationBatch>,
    ) -> Result<(), DomError> {
        self.node(target)?;
        if let Some(existing) = self
            .registrations
            .iter_mut()
            .find(|r| r.observer == observer && r.target == target)
        {
            existing.options = options;
            existing.sender = sender;
            return Ok(());
        }
        trace!("Observer {:?} registered on {:?}", observer, target);
        self.registrations.push(Registration {
            observer,
            target,
            options,
            sender,
        });
        Ok(())
    }

    /// Drop every registration held by `observer`.
    pub fn disconnect(&mut self, observer: ObserverId) {
        self.registrations.retain(|r| r.observer != observer);
    }

    /// Number of registrations whose target is `target`.
    pub fn registration_count(&self, target: NodeId) -> usize {
        self.registrations.iter().filter(|r| r.target == target).count()
    }

    /// Number of registrations held by `observer`.
    pub fn observer_registrations(&self, observer: ObserverId) -> usize {
        self.registrations.iter().filter(|r| r.observer == observer).count()
    }

    /// Hand each observer one batch with the records its registrations match.
    fn deliver(&mut self, records: Vec<MutationRecord>) {
        if records.is_empty() || self.registrations.is_empty() {
            return;
        }

        let mut batches: Vec<(ObserverId, mpsc::UnboundedSender<MutationBatch>, Vec<MutationRecord>)> =
            Vec::new();
        for record in &records {
            for reg in &self.registrations {
                if !reg.options.wants(&record.kind) {
                    continue;
                }
                let in_scope = record.target == reg.target
                    || (reg.options.subtree && self.is_ancestor(reg.target, record.target));
                if !in_scope {
                    continue;
                }
                match batches.iter_mut().find(|(id, _, _)| *id == reg.observer) {
                    Some((_, _, list)) => {
                        if !list.contains(record) {
                            list.push(record.clone());
                        }
                    }
                    None => batches.push((reg.observer, reg.sender.clone(), vec![record.clone()])),
                }
            }
        }

        let mut gone = Vec::new();
        for (observer, sender, records) in batches {
            if sender.send(MutationBatch { observer, records }).is_err() {
                gone.push(observer);
            }
        }
        if !gone.is_empty() {
            self.registrations.retain(|r| !gone.contains(&r.observer));
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Listen for events named `name` reaching `node` (directly or by bubbling).
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        name: &str,
        sender: mpsc::UnboundedSender<DispatchedEvent>,
    ) -> Result<(), DomError> {
        self.node(node)?;
        self.listeners.push(Listener {
            node,
            name: name.to_string(),
            sender,
        });
        Ok(())
    }

    /// Dispatch a synthetic event at `target`. Returns how many listeners saw it.
    pub fn dispatch_event(&mut self, target: NodeId, event: DomEvent) -> Result<usize, DomError> {
        if !self.is_element(target) {
            self.node(target)?;
            return Err(DomError::NotAnElement(target));
        }

        let mut path = vec![target];
        if event.bubbles {
            let mut current = self.parent(target);
            while let Some(node) = current {
                path.push(node);
                current = self.parent(node);
            }
        }

        let mut delivered = 0;
        for current_target in path {
            self.listeners.retain(|listener| {
                if listener.node != current_target || listener.name != event.name {
                    return true;
                }
                let sent = listener.sender.send(DispatchedEvent {
                    target,
                    current_target,
                    event: event.clone(),
                });
                if sent.is_ok() {
                    delivered += 1;
                }
                sent.is_ok()
            });
        }
        trace!("Dispatched '{}' at {:?} to {} listeners", event.name, target, delivered);
        Ok(delivered)
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
