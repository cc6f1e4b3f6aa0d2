//! In-process message channel between the control surface and the page.
//!
//! Requests travel as JSON values, each with its own one-shot reply slot, so
//! the page side may answer asynchronously. Notifications flow the other way
//! over a broadcast channel.

use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, trace, warn};

use promptlift_protocols::{PageNotification, PromptText, RelayError, RelayRequest, RelayResponse};

const REQUEST_CAPACITY: usize = 32;
const NOTIFICATION_CAPACITY: usize = 64;

/// Create a connected client/receiver pair.
pub fn channel() -> (RelayClient, RelayReceiver) {
    let (requests_tx, requests_rx) = mpsc::channel(REQUEST_CAPACITY);
    let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
    (
        RelayClient {
            requests: requests_tx,
            notifications: notifications.clone(),
        },
        RelayReceiver {
            requests: requests_rx,
            notifications,
        },
    )
}

/// A request waiting for its reply.
pub struct Envelope {
    request: Value,
    reply: oneshot::Sender<Value>,
}

impl Envelope {
    pub fn request(&self) -> &Value {
        &self.request
    }

    pub fn respond(self, response: Value) {
        if self.reply.send(response).is_err() {
            debug!("Requester dropped before the reply was sent");
        }
    }
}

/// Control-surface end of the relay.
#[derive(Clone)]
pub struct RelayClient {
    requests: mpsc::Sender<Envelope>,
    notifications: broadcast::Sender<Value>,
}

impl RelayClient {
    /// Send a raw JSON request and wait for the raw reply.
    pub async fn request(&self, request: Value) -> Result<Value, RelayError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Envelope { request, reply: tx })
            .await
            .map_err(|_| RelayError::Disconnected)?;
        rx.await.map_err(|_| RelayError::Disconnected)
    }

    pub async fn send(&self, request: &RelayRequest) -> Result<RelayResponse, RelayError> {
        debug!("Relay request: {}", request.action());
        let reply = self.request(serde_json::to_value(request)?).await?;
        trace!("Relay reply: {}", reply);
        Ok(serde_json::from_value(reply)?)
    }

    pub async fn get_prompt(&self) -> Result<PromptText, RelayError> {
        self.send(&RelayRequest::GetPrompt).await?.into_prompt()
    }

    pub async fn set_prompt(&self, text: &str) -> Result<(), RelayError> {
        self.send(&RelayRequest::SetPrompt {
            enhanced_prompt: text.to_string(),
        })
        .await?
        .into_success()
    }

    pub fn is_connected(&self) -> bool {
        !self.requests.is_closed()
    }

    /// Receive page notifications sent from now on.
    pub fn subscribe(&self) -> Notifications {
        Notifications {
            rx: self.notifications.subscribe(),
        }
    }
}

/// Page end of the relay.
pub struct RelayReceiver {
    requests: mpsc::Receiver<Envelope>,
    notifications: broadcast::Sender<Value>,
}

impl RelayReceiver {
    /// Next request, or `None` once every client is gone.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.requests.recv().await
    }

    pub fn notifier(&self) -> Notifier {
        Notifier {
            tx: self.notifications.clone(),
        }
    }
}

/// Pushes notifications from the page to any subscribed clients.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Value>,
}

impl Notifier {
    pub fn notify(&self, notification: &PageNotification) -> Result<(), RelayError> {
        let value = serde_json::to_value(notification)?;
        if self.tx.send(value).is_err() {
            trace!("No relay subscribers for notification");
        }
        Ok(())
    }
}

/// Stream of page notifications.
pub struct Notifications {
    rx: broadcast::Receiver<Value>,
}

impl Notifications {
    pub async fn next(&mut self) -> Option<PageNotification> {
        loop {
            match self.rx.recv().await {
                Ok(value) => match serde_json::from_value(value) {
                    Ok(notification) => return Some(notification),
                    Err(e) => warn!("Ignoring malformed page notification: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Missed {} page notifications", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
