//! Gemini API client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use promptlift_protocols::EnhanceError;

use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API client.
///
/// One POST per call: no retry, no streaming, and no timeout beyond the
/// connect timeout.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the public endpoint and default model.
    pub fn new(connect_timeout: Duration) -> Result<Self, EnhanceError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| EnhanceError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Point the client at another API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, EnhanceError> {
        debug!("Gemini generate_content: model={}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| EnhanceError::network(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EnhanceError::network(e.without_url().to_string()))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<GeminiError>(&body) {
                debug!(
                    "Gemini rejected request: {} {}",
                    error.error.status, error.error.message
                );
            }
            return Err(EnhanceError::from_status(status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| EnhanceError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
