//! Prompt change observer.
//!
//! Watches a site's prompt input for child-list and character-data mutations
//! and publishes the trimmed text whenever it actually changes. When the input
//! has not been rendered yet, the observer watches the body until it appears.
//! While attached it also watches the direct children of every ancestor of the
//! input, so a re-render that drops the input from the document is noticed.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use promptlift_protocols::{PageError, PageNotification};

use crate::adapter::SiteAdapter;
use crate::document::{Document, MutationBatch, NodeId, ObserveOptions, ObserverId};
use crate::page::SharedDocument;
use crate::registry::SiteRegistry;

const UPDATE_CAPACITY: usize = 64;

/// The prompt text changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUpdated {
    pub text: String,
}

impl From<TextUpdated> for PageNotification {
    fn from(update: TextUpdated) -> Self {
        PageNotification::TextUpdated { text: update.text }
    }
}

/// Suppresses text that equals the last value let through.
#[derive(Debug, Default)]
pub struct ChangeFilter {
    last: String,
}

impl ChangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// `Some(text)` if it differs from the previous accepted value.
    pub fn accept(&mut self, text: &str) -> Option<String> {
        if text == self.last {
            return None;
        }
        self.last = text.to_string();
        Some(self.last.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Idle,
    WaitingForTarget,
    Attached(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached(NodeId),
    AlreadyAttached(NodeId),
    Waiting,
}

pub struct PromptObserver {
    document: SharedDocument,
    adapter: SiteAdapter,
    target_id: ObserverId,
    body_id: ObserverId,
    ancestry_id: ObserverId,
    state: ObserverState,
    filter: ChangeFilter,
    sender: mpsc::UnboundedSender<MutationBatch>,
    receiver: mpsc::UnboundedReceiver<MutationBatch>,
    updates: broadcast::Sender<TextUpdated>,
}

impl PromptObserver {
    pub fn new(document: SharedDocument, adapter: SiteAdapter) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            document,
            adapter,
            target_id: ObserverId::next(),
            body_id: ObserverId::next(),
            ancestry_id: ObserverId::next(),
            state: ObserverState::Idle,
            filter: ChangeFilter::new(),
            sender,
            receiver,
            updates,
        }
    }

    /// Observer for whichever registered site serves the document's URL.
    pub fn for_document(
        document: SharedDocument,
        registry: &SiteRegistry,
    ) -> Result<Self, PageError> {
        let url = document.read().url().to_string();
        let adapter = registry.resolve(&url)?.adapter;
        Ok(Self::new(document, adapter))
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TextUpdated> {
        self.updates.subscribe()
    }

    /// Attach to the input, or start watching the body for it.
    ///
    /// Calling again while attached to the same connected input is a no-op.
    pub fn start(&mut self) -> Result<AttachOutcome, PageError> {
        let document = Arc::clone(&self.document);
        let mut doc = document.write();
        self.attach(&mut doc)
    }

    fn attach(&mut self, doc: &mut Document) -> Result<AttachOutcome, PageError> {
        if let ObserverState::Attached(node) = self.state {
            if doc.is_connected(node) && self.adapter.locate(doc) == Some(node) {
                return Ok(AttachOutcome::AlreadyAttached(node));
            }
            debug!("{} input {:?} left the document", self.adapter, node);
            doc.disconnect(self.target_id);
            doc.disconnect(self.ancestry_id);
        }

        match self.adapter.locate(doc) {
            Some(node) => {
                doc.observe(self.target_id, node, ObserveOptions::content(), self.sender.clone())
                    .map_err(|e| PageError::ElementNotFound(e.to_string()))?;
                self.watch_ancestry(doc, node)?;
                doc.disconnect(self.body_id);
                self.state = ObserverState::Attached(node);
                debug!("Observing {} input {:?}", self.adapter, node);
                Ok(AttachOutcome::Attached(node))
            }
            None => {
                if self.state != ObserverState::WaitingForTarget {
                    let body = doc.body();
                    doc.observe(
                        self.body_id,
                        body,
                        ObserveOptions::child_list_subtree(),
                        self.sender.clone(),
                    )
                    .map_err(|e| PageError::ElementNotFound(e.to_string()))?;
                    self.state = ObserverState::WaitingForTarget;
                    debug!("{} input not rendered yet, watching body", self.adapter);
                }
                Ok(AttachOutcome::Waiting)
            }
        }
    }

    fn watch_ancestry(&self, doc: &mut Document, node: NodeId) -> Result<(), PageError> {
        let mut current = doc.parent(node);
        while let Some(ancestor) = current {
            doc.observe(
                self.ancestry_id,
                ancestor,
                ObserveOptions::child_list(),
                self.sender.clone(),
            )
            .map_err(|e| PageError::ElementNotFound(e.to_string()))?;
            current = doc.parent(ancestor);
        }
        Ok(())
    }

    /// Process one mutation batch.
    pub fn handle_batch(&mut self, batch: MutationBatch) -> Result<Option<TextUpdated>, PageError> {
        let document = Arc::clone(&self.document);

        if batch.observer == self.body_id {
            if self.state == ObserverState::WaitingForTarget {
                let mut doc = document.write();
                self.attach(&mut doc)?;
            }
            return Ok(None);
        }
        if batch.observer == self.ancestry_id {
            if let ObserverState::Attached(_) = self.state {
                let mut doc = document.write();
                self.attach(&mut doc)?;
            }
            return Ok(None);
        }
        if batch.observer != self.target_id {
            return Ok(None);
        }
        let ObserverState::Attached(node) = self.state else {
            return Ok(None);
        };

        let text = {
            let doc = document.read();
            if doc.is_connected(node) {
                Some(self.adapter.read(&doc, node))
            } else {
                None
            }
        };
        let Some(text) = text else {
            let mut doc = document.write();
            self.attach(&mut doc)?;
            return Ok(None);
        };

        match self.filter.accept(text.as_str()) {
            Some(text) => Ok(Some(TextUpdated { text })),
            None => {
                trace!("{} input mutated without a text change", self.adapter);
                Ok(None)
            }
        }
    }

    fn publish(&self, update: &TextUpdated) {
        if self.updates.send(update.clone()).is_err() {
            trace!("No subscribers for text update");
        }
    }

    /// Process every queued batch now, publishing and returning the updates.
    pub fn drain(&mut self) -> Result<Vec<TextUpdated>, PageError> {
        let mut out = Vec::new();
        while let Ok(batch) = self.receiver.try_recv() {
            if let Some(update) = self.handle_batch(batch)? {
                self.publish(&update);
                out.push(update);
            }
        }
        Ok(out)
    }

    /// Drop all registrations and go idle.
    pub fn stop(&mut self) {
        let mut doc = self.document.write();
        doc.disconnect(self.target_id);
        doc.disconnect(self.body_id);
        doc.disconnect(self.ancestry_id);
        self.state = ObserverState::Idle;
    }

    /// Run on a tokio task until the handle is shut down.
    pub fn spawn(mut self) -> ObserverHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let updates = self.updates.clone();

        let task = tokio::spawn(async move {
            if self.state == ObserverState::Idle {
                if let Err(e) = self.start() {
                    warn!("Observer failed to start: {}", e);
                }
            }

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    batch = self.receiver.recv() => {
                        let Some(batch) = batch else {
                            break;
                        };
                        match self.handle_batch(batch) {
                            Ok(Some(update)) => self.publish(&update),
                            Ok(None) => {}
                            Err(e) => warn!("Observer failed to handle mutations: {}", e),
                        }
                    }
                }
            }

            self.stop();
            debug!("Observer for {} stopped", self.adapter);
        });

        ObserverHandle {
            shutdown: shutdown_tx,
            task,
            updates,
        }
    }
}

/// Handle to a spawned [`PromptObserver`].
pub struct ObserverHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
    updates: broadcast::Sender<TextUpdated>,
}

impl ObserverHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<TextUpdated> {
        self.updates.subscribe()
    }

    /// Stop the task and wait for it to release its registrations.
    pub async fn shutdown(self) {
        // The task may already have exited; nothing to signal then.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!("Observer task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
