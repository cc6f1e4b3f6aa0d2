//! Failures talking to the browser over the DevTools protocol.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    /// The `/json/version` lookup got no answer.
    #[error("Chrome is not reachable at {0}; launch it with --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("Could not open the DevTools socket: {0}")]
    ConnectionFailed(String),

    /// Socket failure after the handshake.
    #[error("DevTools socket error: {0}")]
    WebSocket(String),

    /// Tab listing over HTTP failed.
    #[error("DevTools endpoint request failed: {0}")]
    Http(String),

    #[error("No matching tab: {0}")]
    TabNotFound(String),

    /// The browser answered a command with an error object.
    #[error("Browser rejected the command: {message} (code {code})")]
    Protocol { code: i64, message: String },

    /// A script evaluated in the tab threw.
    #[error("Page script threw: {0}")]
    ScriptThrew(String),

    /// Carries the method name.
    #[error("No reply to {0} in time")]
    NoReply(String),

    #[error("DevTools connection closed")]
    SessionClosed,

    #[error("Malformed DevTools message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected reply from the browser: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}
