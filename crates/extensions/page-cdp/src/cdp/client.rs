//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

/// Default per-command timeout.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// One browser WebSocket, shared by the client and every page session on it.
///
/// Dropping the last handle stops the receive task.
pub(crate) struct Connection {
    ws_tx: tokio::sync::Mutex<WsSink>,
    pending: Pending,
    request_id: AtomicU64,
    timeout: Duration,
    recv_task: JoinHandle<()>,
}

impl Connection {
    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::NoReply(method.to_string()))
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

/// CDP client for the browser holding the chat tab.
pub struct CdpClient {
    http_endpoint: String,
    browser_ws_url: String,
    http: reqwest::Client,
    connection: Arc<Connection>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint (e.g. `http://localhost:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        Self::connect_with_timeout(endpoint, DEFAULT_CALL_TIMEOUT).await
    }

    pub async fn connect_with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let http = reqwest::Client::new();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = http
            .get(&version_url)
            .send()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!("Connected to browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;
        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let recv_task = tokio::spawn(receive_loop(ws_source, pending.clone()));

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            http,
            connection: Arc::new(Connection {
                ws_tx: tokio::sync::Mutex::new(ws_sink),
                pending,
                request_id: AtomicU64::new(1),
                timeout,
                recv_task,
            }),
        })
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection.call(method, params, None).await
    }

    /// List all targets from `/json/list`.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let pages: Vec<PageInfo> = self.http.get(&url).send().await?.json().await?;
        Ok(pages)
    }

    /// Attach to an existing tab.
    pub async fn attach_page(&self, page: &PageInfo) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": page.id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        debug!("Attached to page {} ({}) as session {}", page.id, page.url, session_id);

        let session = PageSession::new(self.connection.clone(), session_id, page.id.clone());
        session.enable_runtime().await?;
        Ok(session)
    }
}

/// Routes responses to their waiting callers until the socket closes.
async fn receive_loop(mut ws_source: WsSource, pending: Pending) {
    while let Some(msg) = ws_source.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                trace!("CDP recv: {}", text);
                match serde_json::from_str::<CdpResponse>(&text) {
                    Ok(resp) => dispatch_response(&pending, resp),
                    Err(e) => warn!("Failed to parse CDP message: {}", e),
                }
            }
            Ok(Message::Close(_)) => {
                debug!("WebSocket closed");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    for (_, tx) in pending.lock().drain() {
        let _ = tx.send(Err(CdpError::SessionClosed));
    }
}

/// Complete the caller waiting on `resp.id`. Events carry no id and are dropped.
fn dispatch_response(pending: &Pending, resp: CdpResponse) {
    let Some(id) = resp.id else {
        return;
    };
    let Some(tx) = pending.lock().remove(&id) else {
        return;
    };
    let result = match resp.error {
        Some(error) => Err(CdpError::Protocol {
            code: error.code,
            message: error.message,
        }),
        None => Ok(resp.result.unwrap_or(Value::Null)),
    };
    let _ = tx.send(result);
}
