//! Provider configuration
//!
//! Credentials and endpoint overrides, loaded from the environment.
//! Nothing here is cached process-wide; callers pass what they load into
//! each session explicitly.

use agon_core::Credential;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

use crate::openai::{OpenAiProvider, OPENAI_BASE_URL};
use crate::router::{ProviderRoute, ProviderRouter};
use crate::xai::{XaiProvider, XAI_BASE_URL};

/// Provider credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI API key (env: OPENAI_API_KEY)
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<Credential>,
    /// xAI API key (env: XAI_API_KEY)
    #[serde(default, skip_serializing)]
    pub xai_api_key: Option<Credential>,
    /// OpenAI-compatible base URL (env: OPENAI_BASE_URL)
    pub openai_base_url: String,
    /// xAI base URL (env: XAI_BASE_URL)
    pub xai_base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            xai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            xai_base_url: XAI_BASE_URL.to_string(),
        }
    }
}

fn env_credential(route: ProviderRoute) -> Option<Credential> {
    env::var(route.api_key_env())
        .ok()
        .map(Credential::new)
        .filter(Credential::is_present)
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env_credential(ProviderRoute::Default),
            xai_api_key: env_credential(ProviderRoute::Alternate),
            openai_base_url: env::var(ProviderRoute::Default.base_url_env())
                .unwrap_or_else(|_| OPENAI_BASE_URL.to_string()),
            xai_base_url: env::var(ProviderRoute::Alternate.base_url_env())
                .unwrap_or_else(|_| XAI_BASE_URL.to_string()),
        }
    }

    /// Credential configured for a route
    pub fn api_key(&self, route: ProviderRoute) -> Option<&Credential> {
        match route {
            ProviderRoute::Default => self.openai_api_key.as_ref(),
            ProviderRoute::Alternate => self.xai_api_key.as_ref(),
        }
    }

    /// Credential for the route serving `model`
    pub fn api_key_for(&self, model: &str) -> Option<&Credential> {
        self.api_key(ProviderRoute::for_model(model))
    }

    /// Check if a route has a credential
    pub fn is_configured(&self, route: ProviderRoute) -> bool {
        self.api_key(route).is_some_and(Credential::is_present)
    }

    /// Base URL configured for a route
    pub fn base_url(&self, route: ProviderRoute) -> &str {
        match route {
            ProviderRoute::Default => &self.openai_base_url,
            ProviderRoute::Alternate => &self.xai_base_url,
        }
    }

    /// Build a router over the configured endpoints
    pub fn router(&self) -> ProviderRouter {
        ProviderRouter::with_adapters(
            Arc::new(OpenAiProvider::with_base_url(&self.openai_base_url)),
            Arc::new(XaiProvider::with_base_url(&self.xai_base_url)),
        )
    }
}
