//! xAI provider (alternate route, OpenAI-compatible API)

use async_trait::async_trait;

use crate::compat::ChatCompletionsClient;
use crate::provider::{CompletionProvider, CompletionRequest, ProviderError};

/// Fixed xAI base URL
pub const XAI_BASE_URL: &str = "https://api.x.ai/v1";

/// xAI provider for `grok` models
#[derive(Debug, Clone)]
pub struct XaiProvider {
    client: ChatCompletionsClient,
}

impl XaiProvider {
    pub fn new() -> Self {
        Self::with_base_url(XAI_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: ChatCompletionsClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

impl Default for XaiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for XaiProvider {
    fn name(&self) -> &str {
        "xai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.client.send(&request).await
    }
}
