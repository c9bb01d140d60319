//! # Agon Debate
//!
//! Turn-based debates between two LLM agents.
//!
//! ## Key Types
//!
//! - [`SessionController`] - Runs one debate at a time and owns its transcript
//! - [`prompt::build`] - Turns a transcript into one agent's next request
//! - [`SessionSnapshot`] - What collaborators read: transcript, state, last error
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use agon_core::{AgentConfig, SessionState, Stance};
//! use agon_debate::{SessionController, StartOutcome};
//! use agon_llm::MockProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let controller = SessionController::new(Arc::new(MockProvider::constant("A fair point.")));
//!
//!     let alice = AgentConfig::new("Alice", "gpt-4o-mini", Stance::Proposition).with_credential("sk-a");
//!     let bob = AgentConfig::new("Bob", "grok-2-latest", Stance::Opposition).with_credential("xai-b");
//!
//!     let outcome = controller.start("AI regulation", alice, bob, 1).await.unwrap();
//!     assert_eq!(outcome, StartOutcome::Concluded);
//!
//!     let snapshot = controller.snapshot().await;
//!     assert_eq!(snapshot.state, SessionState::Concluded);
//!     assert_eq!(snapshot.transcript.len(), 4); // welcome, Alice, Bob, closing
//! }
//! ```

pub mod error;
pub mod metrics;
pub mod prompt;
pub mod session;

pub use error::SessionError;
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use session::{
    CancelHandle, SessionController, SessionOptions, SessionSnapshot, StartOutcome,
    CANCELLED_ERROR, CANCELLED_NOTICE, CLOSING_NOTICE, INTERRUPTED_ERROR, INTERRUPTED_NOTICE,
};
