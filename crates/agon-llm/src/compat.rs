//! OpenAI-compatible chat-completions wire format
//!
//! Both adapters speak this format; they differ only in base URL.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::provider::{
    ChatMessage, CompletionRequest, ProviderError, Role, EMPTY_COMPLETION_FALLBACK,
};

/// Longest `name` the upstream accepts
const MAX_NAME_LEN: usize = 64;

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Normalize a participant name to `[A-Za-z0-9_-]{1,64}`
pub fn wire_name(name: &str) -> Option<String> {
    let normalized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    (!normalized.is_empty()).then_some(normalized)
}

fn to_wire(message: &ChatMessage) -> WireMessage<'_> {
    WireMessage {
        role: message.role,
        content: &message.content,
        name: message.name.as_deref().and_then(wire_name),
    }
}

fn build_body(request: &CompletionRequest) -> ChatCompletionsRequest<'_> {
    ChatCompletionsRequest {
        model: &request.model,
        messages: request.messages.iter().map(to_wire).collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

/// The JSON body sent upstream for `request`
pub fn encode_request(request: &CompletionRequest) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(build_body(request))
}

/// Extract the completion text from a successful response body
///
/// A body without `choices` (or with none) is malformed; a first choice
/// with absent or empty content yields [`EMPTY_COMPLETION_FALLBACK`].
pub fn decode_response(body: &str) -> Result<String, ProviderError> {
    let response: ChatCompletionsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    let first = response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or_else(|| ProviderError::InvalidResponse("response contained no choices".to_string()))?;

    let content = first
        .message
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| EMPTY_COMPLETION_FALLBACK.to_string());

    Ok(content)
}

/// Best-effort upstream message for a failed call
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// HTTP client for one OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL, without trailing slash (e.g., "https://api.openai.com/v1")
    base_url: String,
}

impl ChatCompletionsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue exactly one chat-completions call
    pub async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        if !request.api_key.is_present() {
            return Err(ProviderError::MissingCredential);
        }

        let start = Instant::now();
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(request.api_key.expose())
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let content = decode_response(&body)?;
        tracing::debug!(
            model = %request.model,
            elapsed = ?start.elapsed(),
            chars = content.len(),
            "completion received"
        );
        Ok(content)
    }
}
