//! Completion provider trait and common types

use agon_core::Credential;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text returned when the provider answers without any content
pub const EMPTY_COMPLETION_FALLBACK: &str = "No response generated.";

/// Errors from completion providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Missing API credential")]
    MissingCredential,
}

impl ProviderError {
    /// Authentication or authorization rejected by the upstream
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ProviderError::Upstream { status: 401 | 403, .. } | ProviderError::MissingCredential
        )
    }
}

/// Speaker role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat-completion conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Optional participant name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A single completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered conversation, system message first
    pub messages: Vec<ChatMessage>,
    /// Model id (e.g., "gpt-4o-mini", "grok-2-latest")
    pub model: String,
    /// Temperature (0.0 = deterministic)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Bearer credential for this call
    pub api_key: Credential,
}

/// Trait for completion providers
///
/// One attempt per call: implementations never retry and never fall back
/// to another provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Generate one completion and return its text
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_omits_absent_name() {
        let json = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));

        let json = serde_json::to_value(ChatMessage::assistant("hi").named("Alice")).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn test_auth_errors() {
        let unauthorized = ProviderError::Upstream {
            status: 401,
            message: "bad key".to_string(),
        };
        assert!(unauthorized.is_auth());
        assert!(!ProviderError::Connection("reset".to_string()).is_auth());
    }
}
