//! Model-prefix routing between the two adapters
//!
//! Routing is a closed table: adding a provider means one new row in
//! [`ROUTES`], one [`ProviderRoute`] variant and one adapter.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::openai::OpenAiProvider;
use crate::provider::{CompletionProvider, CompletionRequest, ProviderError};
use crate::xai::XaiProvider;

/// Which adapter serves a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRoute {
    /// Standard OpenAI endpoint
    Default,
    /// Alternate endpoint (xAI)
    Alternate,
}

/// Model-id prefix → route. Models matching no row use [`ProviderRoute::Default`].
pub const ROUTES: &[(&str, ProviderRoute)] = &[("grok", ProviderRoute::Alternate)];

impl ProviderRoute {
    /// Route for a model id
    pub fn for_model(model: &str) -> Self {
        ROUTES
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
            .map(|(_, route)| *route)
            .unwrap_or(ProviderRoute::Default)
    }

    /// Only the reserved family honours the unrestrained persona
    pub fn supports_unrestrained_persona(self) -> bool {
        matches!(self, ProviderRoute::Alternate)
    }

    /// Environment variable holding this route's API key
    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderRoute::Default => "OPENAI_API_KEY",
            ProviderRoute::Alternate => "XAI_API_KEY",
        }
    }

    /// Environment variable overriding this route's base URL
    pub fn base_url_env(self) -> &'static str {
        match self {
            ProviderRoute::Default => "OPENAI_BASE_URL",
            ProviderRoute::Alternate => "XAI_BASE_URL",
        }
    }

    pub fn all() -> [ProviderRoute; 2] {
        [ProviderRoute::Default, ProviderRoute::Alternate]
    }
}

impl fmt::Display for ProviderRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderRoute::Default => f.write_str("default"),
            ProviderRoute::Alternate => f.write_str("alternate"),
        }
    }
}

/// Dispatches each request to the adapter for its model
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    default: Arc<dyn CompletionProvider>,
    alternate: Arc<dyn CompletionProvider>,
}

impl ProviderRouter {
    /// Router over the real OpenAI and xAI endpoints
    pub fn new() -> Self {
        Self::with_adapters(Arc::new(OpenAiProvider::new()), Arc::new(XaiProvider::new()))
    }

    /// Router over arbitrary adapters
    pub fn with_adapters(
        default: Arc<dyn CompletionProvider>,
        alternate: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self { default, alternate }
    }

    /// Adapter that would serve `model`
    pub fn adapter_for(&self, model: &str) -> &Arc<dyn CompletionProvider> {
        match ProviderRoute::for_model(model) {
            ProviderRoute::Default => &self.default,
            ProviderRoute::Alternate => &self.alternate,
        }
    }
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for ProviderRouter {
    fn name(&self) -> &str {
        "router"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let adapter = self.adapter_for(&request.model);
        tracing::trace!(model = %request.model, adapter = adapter.name(), "routing completion");
        adapter.complete(request).await
    }
}
