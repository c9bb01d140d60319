//! Session lifecycle types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest rounds a session may plan
pub const MIN_ROUNDS: u32 = 1;
/// Most rounds a session may plan
pub const MAX_ROUNDS: u32 = 10;
/// Rounds used when the caller does not choose
pub const DEFAULT_ROUNDS: u32 = 3;

/// Lifecycle of a debate session
///
/// `Idle -> Running -> {Concluded, Errored}`, and back to `Idle` on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Concluded,
    Errored,
}

impl SessionState {
    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::{Concluded, Errored, Idle, Running};
        matches!(
            (self, next),
            (Idle, Running) | (Running, Concluded) | (Running, Errored) | (Concluded, Idle) | (Errored, Idle)
        )
    }

    /// Concluded or Errored
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Concluded | SessionState::Errored)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Concluded => "concluded",
            SessionState::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// Number of planned rounds, always within [`MIN_ROUNDS`, `MAX_ROUNDS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub struct RoundCount(u32);

impl RoundCount {
    /// Clamp any requested count into the allowed range
    pub fn clamped(requested: u32) -> Self {
        Self(requested.clamp(MIN_ROUNDS, MAX_ROUNDS))
    }

    /// `None` when the requested count is out of range
    pub fn checked(requested: u32) -> Option<Self> {
        (MIN_ROUNDS..=MAX_ROUNDS)
            .contains(&requested)
            .then_some(Self(requested))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RoundCount {
    fn default() -> Self {
        Self(DEFAULT_ROUNDS)
    }
}

impl From<u32> for RoundCount {
    fn from(value: u32) -> Self {
        Self::clamped(value)
    }
}

impl From<RoundCount> for u32 {
    fn from(value: RoundCount) -> Self {
        value.0
    }
}

/// Debate topic, non-blank and fixed for a session's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// `None` for empty or whitespace-only input
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
