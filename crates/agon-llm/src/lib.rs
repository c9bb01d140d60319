//! # Agon LLM
//!
//! Chat-completion providers for Agon debates.
//!
//! ## Supported Backends
//!
//! | Route | Provider | Models | Key Required |
//! |-------|----------|--------|--------------|
//! | default | OpenAI | anything not listed below | `OPENAI_API_KEY` |
//! | alternate | xAI | `grok*` | `XAI_API_KEY` |
//! | - | Mock | testing | None |
//!
//! Both real adapters speak the OpenAI chat-completions format and differ
//! only in base URL. Each call is a single attempt: no retries, no
//! fallback to another provider.
//!
//! ## Quick Start
//!
//! ```rust
//! use agon_core::Credential;
//! use agon_llm::{ChatMessage, CompletionProvider, CompletionRequest, MockProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = MockProvider::constant("Regulation stifles innovation.");
//!
//!     let request = CompletionRequest {
//!         messages: vec![ChatMessage::system("You are debating."), ChatMessage::user("Go.")],
//!         model: "gpt-4o-mini".to_string(),
//!         temperature: 0.7,
//!         max_tokens: 200,
//!         api_key: Credential::new("sk-test"),
//!     };
//!     let text = llm.complete(request).await.unwrap();
//!     assert_eq!(text, "Regulation stifles innovation.");
//! }
//! ```
//!
//! ## With real endpoints
//!
//! ```rust,ignore
//! use agon_llm::{LlmConfig, ProviderRoute};
//!
//! let config = LlmConfig::from_env();
//! let router = config.router(); // routes grok-* to xAI, everything else to OpenAI
//! assert_eq!(ProviderRoute::for_model("grok-2-latest"), ProviderRoute::Alternate);
//! ```

pub mod compat;
pub mod config;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod router;
pub mod xai;

pub use compat::ChatCompletionsClient;
pub use config::LlmConfig;
pub use mock::{MockProvider, MockReply};
pub use openai::OpenAiProvider;
pub use provider::{
    ChatMessage, CompletionProvider, CompletionRequest, ProviderError, Role,
    EMPTY_COMPLETION_FALLBACK,
};
pub use router::{ProviderRoute, ProviderRouter, ROUTES};
pub use xai::XaiProvider;
