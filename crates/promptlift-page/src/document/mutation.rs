//! Mutation records and observer registrations.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::NodeId;

static NEXT_OBSERVER: AtomicU64 = AtomicU64::new(1);

/// Identity of one mutation observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_OBSERVER.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a registration wants to hear about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub character_data: bool,
    pub attributes: bool,
    pub subtree: bool,
}

impl ObserveOptions {
    /// Child-list and character-data changes anywhere under the target.
    pub fn content() -> Self {
        Self {
            child_list: true,
            character_data: true,
            attributes: false,
            subtree: true,
        }
    }

    /// Child-list changes anywhere under the target.
    pub fn child_list_subtree() -> Self {
        Self {
            child_list: true,
            character_data: false,
            attributes: false,
            subtree: true,
        }
    }

    /// Direct child insertions and removals on the target only.
    pub fn child_list() -> Self {
        Self {
            child_list: true,
            character_data: false,
            attributes: false,
            subtree: false,
        }
    }

    pub(crate) fn wants(&self, kind: &MutationKind) -> bool {
        match kind {
            MutationKind::ChildList { .. } => self.child_list,
            MutationKind::CharacterData { .. } => self.character_data,
            MutationKind::Attributes { .. } => self.attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    ChildList {
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    CharacterData {
        old_value: String,
    },
    Attributes {
        name: String,
        old_value: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

/// Records delivered to one observer for one mutating operation.
#[derive(Debug, Clone)]
pub struct MutationBatch {
    pub observer: ObserverId,
    pub records: Vec<MutationRecord>,
}

pub(crate) struct Registration {
    pub observer: ObserverId,
    pub target: NodeId,
    pub options: ObserveOptions,
    pub sender: mpsc::UnboundedSender<MutationBatch>,
}
