//! Page-side request handler.

use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use promptlift_page::TextUpdated;
use promptlift_protocols::message::{COULD_NOT_SET, NOT_FOUND, UNKNOWN_ACTION};
use promptlift_protocols::{PageNotification, PromptPage, RelayRequest, RelayResponse};

use crate::transport::{Notifier, RelayReceiver};

/// Answers relay requests against a page.
///
/// Typed page errors stay in this process (they are logged); the wire only
/// carries the short `not found` / `could not set` strings.
pub struct ContentScript<P: PromptPage> {
    page: P,
}

impl<P: PromptPage> ContentScript<P> {
    pub fn new(page: P) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Handle one raw request.
    pub async fn handle(&self, request: Value) -> Value {
        match serde_json::from_value::<RelayRequest>(request) {
            Ok(request) => encode(&self.dispatch(request).await),
            Err(e) => {
                debug!("Rejecting relay request: {}", e);
                encode(&RelayResponse::error(UNKNOWN_ACTION))
            }
        }
    }

    pub async fn dispatch(&self, request: RelayRequest) -> RelayResponse {
        match request {
            RelayRequest::GetPrompt => match self.page.read_prompt().await {
                Ok(text) => RelayResponse::prompt(text.into_string()),
                Err(e) => {
                    warn!("getPrompt failed on {}: {}", self.page.url().await, e);
                    RelayResponse::error(NOT_FOUND)
                }
            },
            RelayRequest::SetPrompt { enhanced_prompt } => {
                match self.page.write_prompt(&enhanced_prompt).await {
                    Ok(()) => RelayResponse::success(),
                    Err(e) => {
                        warn!("setPrompt failed on {}: {}", self.page.url().await, e);
                        RelayResponse::error(COULD_NOT_SET)
                    }
                }
            }
        }
    }

    /// Answer requests until every client is dropped.
    pub async fn serve(&self, mut receiver: RelayReceiver) {
        while let Some(envelope) = receiver.recv().await {
            let reply = self.handle(envelope.request().clone()).await;
            envelope.respond(reply);
        }
        debug!("Relay closed, content script stopping");
    }

    pub fn spawn(self, receiver: RelayReceiver) -> JoinHandle<()>
    where
        P: 'static,
    {
        tokio::spawn(async move { self.serve(receiver).await })
    }
}

fn encode(response: &RelayResponse) -> Value {
    match response {
        RelayResponse::Prompt { prompt } => json!({ "prompt": prompt }),
        RelayResponse::Success { success } => json!({ "success": success }),
        RelayResponse::Error { error } => json!({ "error": error }),
    }
}

/// Relay observer updates as `textUpdated` notifications until the observer stops.
pub fn forward_updates(
    mut updates: broadcast::Receiver<TextUpdated>,
    notifier: Notifier,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let notification = PageNotification::from(update);
                    if let Err(e) = notifier.notify(&notification) {
                        warn!("Failed to relay text update: {}", e);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    info!("Skipped {} stale text updates", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
#[path = "content_script_tests.rs"]
mod tests;
