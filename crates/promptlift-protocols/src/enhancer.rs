//! Enhancement service trait.

use async_trait::async_trait;

use crate::error::EnhanceError;
use crate::types::{Credential, EnhancementRequest};

/// A remote service that rewrites a prompt into a clearer version.
///
/// One request, one reply: implementations do not retry or stream.
#[async_trait]
pub trait PromptEnhancer: Send + Sync {
    /// Service identifier used in logs.
    fn id(&self) -> &str;

    /// Enhance the request's prompt using `credential`.
    async fn enhance(
        &self,
        request: EnhancementRequest,
        credential: &Credential,
    ) -> Result<String, EnhanceError>;
}
