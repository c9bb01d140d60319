//! OpenAI provider (default route)

use async_trait::async_trait;

use crate::compat::ChatCompletionsClient;
use crate::provider::{CompletionProvider, CompletionRequest, ProviderError};

/// Standard OpenAI base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider
///
/// Stateless: model, sampling parameters and credential all arrive with
/// each request.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: ChatCompletionsClient,
}

impl OpenAiProvider {
    /// Create a provider against the standard endpoint
    pub fn new() -> Self {
        Self::with_base_url(OPENAI_BASE_URL)
    }

    /// Create a provider against a compatible endpoint (proxy, test server)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: ChatCompletionsClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.client.send(&request).await
    }
}
