//! Relay (cross-context messaging) errors.

use thiserror::Error;

use super::PageError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The other side of the relay is gone.
    #[error("Relay disconnected")]
    Disconnected,

    /// A message could not be encoded or decoded.
    #[error("Relay protocol error: {0}")]
    Protocol(String),

    /// The page answered with `{ "error": ... }`.
    #[error("{0}")]
    Remote(String),

    #[error(transparent)]
    Page(#[from] PageError),
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Protocol(e.to_string())
    }
}
