//! Gemini-backed prompt enhancer.

use async_trait::async_trait;
use tracing::debug;

use promptlift_protocols::{Credential, EnhanceError, EnhancementRequest, PromptEnhancer};

use crate::client::GeminiClient;
use crate::template::render_prompt;
use crate::types::GenerateContentRequest;

pub struct GeminiEnhancer {
    client: GeminiClient,
}

impl GeminiEnhancer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GeminiClient {
        &self.client
    }
}

#[async_trait]
impl PromptEnhancer for GeminiEnhancer {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn enhance(
        &self,
        request: EnhancementRequest,
        credential: &Credential,
    ) -> Result<String, EnhanceError> {
        let body = GenerateContentRequest::from_text(render_prompt(request.prompt_text.as_str()));
        let response = self.client.generate_content(credential.expose(), &body).await?;

        let text = response.first_text().ok_or_else(|| {
            EnhanceError::MalformedResponse("no text in candidates[0].content.parts".to_string())
        })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(EnhanceError::MalformedResponse(
                "generated text is empty".to_string(),
            ));
        }

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Gemini usage: prompt={} candidates={} total={}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }
        Ok(text.to_string())
    }
}
