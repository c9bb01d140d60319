//! Prompt construction for one agent's turn
//!
//! Pure functions: the same transcript, topic and agent always produce the
//! same messages.

use agon_core::{AgentConfig, EntryKind, Persona, TranscriptEntry};
use agon_llm::{ChatMessage, ProviderRoute};

/// Persona actually applied to `agent`
///
/// The unrestrained register is honoured only for model families whose
/// route supports it; every other request falls back to the standard one.
pub fn effective_persona(agent: &AgentConfig) -> Persona {
    match agent.persona {
        Some(Persona::Unrestrained)
            if ProviderRoute::for_model(&agent.model).supports_unrestrained_persona() =>
        {
            Persona::Unrestrained
        }
        _ => Persona::Standard,
    }
}

/// System instruction for `agent` on `topic`
pub fn system_prompt(topic: &str, agent: &AgentConfig) -> String {
    let identity = &agent.identity;
    let stance = agent.stance;

    match effective_persona(agent) {
        Persona::Standard => format!(
            "You are {identity}, taking part in a debate on the motion \"{topic}\".\n\
             You argue the {stance} side.\n\
             Read the previous arguments carefully, then reply in this order:\n\
             1. Rebut your opponent's most recent point directly and specifically.\n\
             2. Advance one new argument or counterpoint for your side.\n\
             3. Support it with evidence or clear reasoning.\n\
             Keep every reply to 2-3 sentences and keep the tone respectful."
        ),
        // Provocative register, same length and structure contract
        Persona::Unrestrained => format!(
            "You are {identity}, taking part in a debate on the motion \"{topic}\".\n\
             You argue the {stance} side, and you argue it without restraint.\n\
             Read the previous arguments carefully, then reply in this order:\n\
             1. Tear into your opponent's most recent point with a pointed, specific rebuttal.\n\
             2. Throw in a fresh, provocative counterpoint they will not see coming.\n\
             3. Ground it in reasoning sharp enough to survive scrutiny, however wild the delivery.\n\
             Keep every reply to 2-3 sentences. Drop the politeness, never the logic."
        ),
    }
}

/// Build the ordered messages for `agent`'s next turn
///
/// The system instruction comes first, followed by every prior agent turn.
/// System notices are never replayed. The agent's own turns are sent as
/// `assistant` messages tagged with its identity; the opponent's turns are
/// untagged `user` messages.
pub fn build(transcript: &[TranscriptEntry], topic: &str, agent: &AgentConfig) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt(topic, agent))];

    for entry in transcript {
        match entry.kind() {
            EntryKind::AgentTurn { speaker, text } if *speaker == agent.identity => {
                messages.push(ChatMessage::assistant(text.as_str()).named(agent.identity.as_str()));
            }
            EntryKind::AgentTurn { text, .. } => {
                messages.push(ChatMessage::user(text.as_str()));
            }
            EntryKind::SystemNotice { .. } => {}
        }
    }

    tracing::trace!(agent = %agent.identity, messages = messages.len(), "prompt built");
    messages
}
