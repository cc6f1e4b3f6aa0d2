//! Enhancement service errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnhanceError {
    /// Network failure (`status` is `None`) or a non-2xx response, with the
    /// remote body kept verbatim.
    #[error("{}", transport_message(.status, .body))]
    Transport { status: Option<u16>, body: String },

    /// A 2xx response that lacks the generated text.
    #[error("Unexpected API response format: {0}")]
    MalformedResponse(String),

    #[error("No API key configured; save a Gemini API key first")]
    MissingCredential,
}

fn transport_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("API request failed: {} - {}", code, body),
        None => format!("API request failed: {}", body),
    }
}

impl EnhanceError {
    /// Create a transport error from a non-success HTTP response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        EnhanceError::Transport {
            status: Some(status),
            body: body.into(),
        }
    }

    /// Create a transport error for a request that never got a response.
    pub fn network(reason: impl Into<String>) -> Self {
        EnhanceError::Transport {
            status: None,
            body: reason.into(),
        }
    }

    /// HTTP status of the failed call, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            EnhanceError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_with_status() {
        let err = EnhanceError::from_status(403, r#"{"error":{"message":"denied"}}"#);
        let display = err.to_string();
        assert!(display.contains("403"));
        assert!(display.contains("denied"));
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_transport_error_network() {
        let err = EnhanceError::network("connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_malformed_response_display() {
        let err = EnhanceError::MalformedResponse("missing candidates".to_string());
        assert!(err.to_string().contains("Unexpected API response format"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_missing_credential_display() {
        let err = EnhanceError::MissingCredential;
        assert!(err.to_string().contains("API key"));
    }
}
