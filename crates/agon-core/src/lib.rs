//! # Agon Core
//!
//! Core types for the Agon debate engine:
//! - [`AgentConfig`] - One debate participant (model, sampling, stance, credential)
//! - [`TranscriptStore`] - Append-only, ordered log of a session
//! - [`SessionState`] - Lifecycle of a debate session
//!
//! ## Quick Start
//!
//! ```rust
//! use agon_core::{EntryKind, TranscriptStore};
//!
//! let mut transcript = TranscriptStore::new();
//! transcript.append(EntryKind::notice("Welcome"));
//! transcript.append(EntryKind::turn("Alice", "Opening argument"));
//!
//! assert_eq!(transcript.len(), 2);
//! assert_eq!(transcript.agent_turns().count(), 1);
//! ```

pub mod agent;
pub mod session;
pub mod transcript;

pub use agent::{validate_pair, AgentConfig, ConfigError, Credential, Persona, Stance};
pub use session::{RoundCount, SessionState, Topic, DEFAULT_ROUNDS, MAX_ROUNDS, MIN_ROUNDS};
pub use transcript::{EntryKind, TranscriptEntry, TranscriptStore};
