//! Debate session controller
//!
//! Owns the lifecycle `Idle -> Running -> {Concluded, Errored}` and drives
//! the round/turn loop. Turns run strictly one after another: each prompt
//! is built from the transcript produced by every earlier turn.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agon_core::{
    validate_pair, AgentConfig, EntryKind, RoundCount, SessionState, Topic, TranscriptEntry,
    TranscriptStore,
};
use agon_llm::{CompletionProvider, CompletionRequest, ProviderError};
use serde::Serialize;
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::error::SessionError;
use crate::metrics::SessionMetrics;
use crate::prompt;

/// Notice text appended when a session is cancelled between turns
pub const CANCELLED_NOTICE: &str = "The debate was stopped before completion.";
/// `last_error` value for a cancelled session
pub const CANCELLED_ERROR: &str = "cancelled by user";
/// Notice appended when a running `start` future is dropped before it finishes
pub const INTERRUPTED_NOTICE: &str = "The debate was interrupted before completion.";
/// `last_error` value for an interrupted session
pub const INTERRUPTED_ERROR: &str = "session interrupted";
/// Closing notice of a session that ran every round
pub const CLOSING_NOTICE: &str = "The debate has concluded. Thank you to both participants.";

/// Welcome notice for `topic`
pub fn welcome_notice(topic: &str) -> String {
    format!("Welcome to the debate on: \"{}\". The debate will now begin.", topic)
}

/// Notice recorded when `identity`'s provider call fails
pub fn failure_notice(identity: &str, error: &ProviderError) -> String {
    format!(
        "{} failed to respond: {}. The debate has been halted.",
        identity, error
    )
}

/// Configuration for the controller
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Pause between consecutive turns
    pub turn_delay: Duration,
}

/// How a started session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartOutcome {
    Concluded,
    Errored,
    Cancelled,
}

/// Cooperative cancellation flag, honoured only between turns
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Request that the running session stop before its next turn
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Read-only view of a session for collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Id of the current (or last) session, `None` when idle
    pub session_id: Option<Uuid>,
    pub topic: Option<String>,
    pub state: SessionState,
    /// Round in progress, 0 before the first turn
    pub current_round: u32,
    pub rounds_planned: u32,
    pub transcript: Vec<TranscriptEntry>,
    /// Failure to show outside the transcript
    pub last_error: Option<String>,
}

/// Mutable session record, guarded by the controller's lock
#[derive(Debug, Default)]
struct Session {
    id: Option<Uuid>,
    topic: Option<Topic>,
    rounds_planned: u32,
    current_round: u32,
    state: SessionState,
    transcript: TranscriptStore,
    last_error: Option<String>,
}

impl Session {
    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            topic: self.topic.as_ref().map(|t| t.to_string()),
            state: self.state,
            current_round: self.current_round,
            rounds_planned: self.rounds_planned,
            transcript: self.transcript.read().to_vec(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Ends the session as `Errored` if `start` is dropped while it is still running
struct InterruptGuard<'a> {
    controller: &'a SessionController,
    session_id: Uuid,
}

impl Drop for InterruptGuard<'_> {
    fn drop(&mut self) {
        let mut session = self.controller.session.write();
        if session.state != SessionState::Running || session.id != Some(self.session_id) {
            return;
        }

        warn!(session_id = %self.session_id, round = session.current_round, "debate interrupted");
        session.transcript.append(EntryKind::notice(INTERRUPTED_NOTICE));
        session.transition(SessionState::Errored);
        session.last_error = Some(INTERRUPTED_ERROR.to_string());
        self.controller.metrics.record_interrupted();
        self.controller.publish(&session);
    }
}

/// Drives one debate at a time between two agents
///
/// Share it behind an `Arc`: one task awaits [`SessionController::start`]
/// while others read snapshots or attempt a reset.
#[derive(Debug)]
pub struct SessionController {
    provider: Arc<dyn CompletionProvider>,
    options: SessionOptions,
    session: RwLock<Session>,
    cancel: CancelHandle,
    updates: watch::Sender<SessionSnapshot>,
    metrics: SessionMetrics,
}

impl SessionController {
    /// Create a controller that sends every turn to `provider`
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::with_options(provider, SessionOptions::default())
    }

    pub fn with_options(provider: Arc<dyn CompletionProvider>, options: SessionOptions) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::default());
        Self {
            provider,
            options,
            session: RwLock::new(Session::default()),
            cancel: CancelHandle::default(),
            updates,
            metrics: SessionMetrics::new(),
        }
    }

    /// Current transcript, state and last error
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().snapshot()
    }

    pub async fn state(&self) -> SessionState {
        self.session.read().state
    }

    /// Receive a fresh snapshot after every append and state change
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Handle for stopping the running session between turns
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    fn publish(&self, session: &Session) {
        self.updates.send_replace(session.snapshot());
    }

    /// Run a complete debate
    ///
    /// Rejected without any state change when the topic is blank
    /// ([`SessionError::Validation`]), a session is already running
    /// ([`SessionError::Busy`]) or either agent is misconfigured
    /// ([`SessionError::Configuration`]). Otherwise the transcript is
    /// replaced by a new session and the call returns once it has
    /// concluded, errored or been cancelled. Provider failures never
    /// surface as `Err`.
    ///
    /// Dropping the returned future mid-session (an aborted task, a lost
    /// `select!`, a timeout) ends the session as `Errored` with
    /// [`INTERRUPTED_NOTICE`], so the controller can be reset afterwards.
    pub async fn start(
        &self,
        topic: &str,
        agent_a: AgentConfig,
        agent_b: AgentConfig,
        rounds_planned: u32,
    ) -> Result<StartOutcome, SessionError> {
        let topic = Topic::parse(topic)
            .ok_or_else(|| SessionError::Validation("topic must not be empty".to_string()))?;

        let (session_id, rounds) = {
            let mut session = self.session.write();
            if session.state == SessionState::Running {
                debug!("start ignored: a debate is already running");
                return Err(SessionError::Busy);
            }
            validate_pair(&agent_a, &agent_b)?;

            let rounds = RoundCount::clamped(rounds_planned);
            if rounds.get() != rounds_planned {
                warn!(requested = rounds_planned, clamped = rounds.get(), "rounds out of range");
            }

            let session_id = Uuid::new_v4();
            session.id = Some(session_id);
            session.topic = Some(topic.clone());
            session.rounds_planned = rounds.get();
            session.current_round = 0;
            session.last_error = None;
            session.transcript.clear();
            session.transcript.append(EntryKind::notice(welcome_notice(topic.as_str())));
            if session.state.is_finished() {
                session.transition(SessionState::Idle);
            }
            session.transition(SessionState::Running);

            self.cancel.clear();
            self.publish(&session);
            (session_id, rounds)
        };
        let _interrupt = InterruptGuard {
            controller: self,
            session_id,
        };

        self.metrics.record_started();
        info!(
            %session_id,
            topic = %topic,
            agent_a = %agent_a.identity,
            agent_b = %agent_b.identity,
            rounds = rounds.get(),
            "debate started"
        );

        let span = tracing::info_span!("debate", %session_id);
        let outcome = self
            .run_rounds(&topic, [&agent_a, &agent_b], rounds.get())
            .instrument(span)
            .await;
        Ok(outcome)
    }

    async fn run_rounds(&self, topic: &Topic, agents: [&AgentConfig; 2], rounds: u32) -> StartOutcome {
        let mut first_turn = true;

        for round in 1..=rounds {
            for agent in agents {
                if !first_turn && !self.options.turn_delay.is_zero() {
                    tokio::time::sleep(self.options.turn_delay).await;
                }
                first_turn = false;

                if self.cancel.is_cancelled() {
                    return self.halt_cancelled(round);
                }

                let messages = {
                    let mut session = self.session.write();
                    session.current_round = round;
                    self.publish(&session);
                    prompt::build(session.transcript.read(), topic.as_str(), agent)
                };

                let request = CompletionRequest {
                    messages,
                    model: agent.model.clone(),
                    temperature: agent.temperature,
                    max_tokens: agent.max_tokens,
                    api_key: agent.credential.clone(),
                };

                debug!(round, agent = %agent.identity, model = %agent.model, "requesting turn");
                match self.provider.complete(request).await {
                    Ok(text) => {
                        let mut session = self.session.write();
                        session.transcript.append(EntryKind::turn(agent.identity.as_str(), text));
                        self.metrics.record_turn();
                        self.publish(&session);
                    }
                    Err(error) => {
                        warn!(round, agent = %agent.identity, %error, "provider call failed, halting debate");
                        let mut session = self.session.write();
                        session
                            .transcript
                            .append(EntryKind::notice(failure_notice(&agent.identity, &error)));
                        session.transition(SessionState::Errored);
                        session.last_error = Some(error.to_string());
                        self.metrics.record_provider_failure();
                        self.publish(&session);
                        return StartOutcome::Errored;
                    }
                }
            }
        }

        let mut session = self.session.write();
        session.transcript.append(EntryKind::notice(CLOSING_NOTICE));
        session.transition(SessionState::Concluded);
        self.metrics.record_concluded();
        self.publish(&session);
        info!(turns = rounds * 2, "debate concluded");
        StartOutcome::Concluded
    }

    fn halt_cancelled(&self, round: u32) -> StartOutcome {
        warn!(round, "debate cancelled before turn");
        let mut session = self.session.write();
        session.transcript.append(EntryKind::notice(CANCELLED_NOTICE));
        session.transition(SessionState::Errored);
        session.last_error = Some(CANCELLED_ERROR.to_string());
        self.metrics.record_cancelled();
        self.publish(&session);
        StartOutcome::Cancelled
    }

    /// Return to `Idle`, discarding the finished session
    ///
    /// Rejected with [`SessionError::Busy`] while a session is running.
    pub async fn reset(&self) -> Result<(), SessionError> {
        let mut session = self.session.write();
        if session.state == SessionState::Running {
            debug!("reset rejected: a debate is running");
            return Err(SessionError::Busy);
        }

        session.transcript.clear();
        session.id = None;
        session.topic = None;
        session.rounds_planned = 0;
        session.current_round = 0;
        session.last_error = None;
        if session.state.is_finished() {
            session.transition(SessionState::Idle);
        }
        self.publish(&session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agon_core::Stance;
    use agon_llm::MockProvider;

    fn agents() -> (AgentConfig, AgentConfig) {
        (
            AgentConfig::new("Alice", "gpt-4o-mini", Stance::Proposition).with_credential("sk-a"),
            AgentConfig::new("Bob", "grok-2-latest", Stance::Opposition).with_credential("xai-b"),
        )
    }

    #[tokio::test]
    async fn test_welcome_and_closing_text() {
        let controller = SessionController::new(Arc::new(MockProvider::constant("ok")));
        let (a, b) = agents();
        controller.start("AI regulation", a, b, 1).await.unwrap();

        let snapshot = controller.snapshot().await;
        assert_eq!(
            snapshot.transcript[0].text(),
            "Welcome to the debate on: \"AI regulation\". The debate will now begin."
        );
        assert_eq!(snapshot.transcript.last().unwrap().text(), CLOSING_NOTICE);
        assert_eq!(snapshot.current_round, 1);
        assert_eq!(snapshot.rounds_planned, 1);
        assert!(snapshot.session_id.is_some());
    }

    #[tokio::test]
    async fn test_rounds_are_clamped() {
        let controller = SessionController::new(Arc::new(MockProvider::constant("ok")));
        let (a, b) = agents();
        controller.start("topic", a.clone(), b.clone(), 0).await.unwrap();
        assert_eq!(controller.snapshot().await.transcript.len(), 1 + 2 + 1);

        controller.reset().await.unwrap();
        controller.start("topic", a, b, 25).await.unwrap();
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.rounds_planned, 10);
        assert_eq!(snapshot.transcript.len(), 1 + 20 + 1);
    }

    #[test]
    fn test_failure_notice_names_agent() {
        let error = ProviderError::Upstream {
            status: 401,
            message: "Incorrect API key".to_string(),
        };
        let notice = failure_notice("Bob", &error);
        assert!(notice.starts_with("Bob failed to respond"));
        assert!(notice.contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn test_start_from_finished_state_without_reset() {
        let controller = SessionController::new(Arc::new(MockProvider::constant("ok")));
        let (a, b) = agents();
        controller.start("first", a.clone(), b.clone(), 1).await.unwrap();
        let first_id = controller.snapshot().await.session_id;

        let outcome = controller.start("second", a, b, 1).await.unwrap();
        let snapshot = controller.snapshot().await;
        assert_eq!(outcome, StartOutcome::Concluded);
        assert_eq!(snapshot.topic.as_deref(), Some("second"));
        assert_ne!(snapshot.session_id, first_id);
        assert_eq!(snapshot.transcript.len(), 4);
    }
}
