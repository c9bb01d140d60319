//! Append-only transcript of a debate session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a transcript entry records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// Message from the engine itself (welcome, closing, failure)
    SystemNotice { text: String },
    /// Text generated for one agent's turn
    AgentTurn { speaker: String, text: String },
}

impl EntryKind {
    pub fn notice(text: impl Into<String>) -> Self {
        EntryKind::SystemNotice { text: text.into() }
    }

    pub fn turn(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        EntryKind::AgentTurn {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// A single, immutable transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    seq: u64,
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    kind: EntryKind,
}

impl TranscriptEntry {
    /// Monotonic sequence id assigned by the store
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn text(&self) -> &str {
        match &self.kind {
            EntryKind::SystemNotice { text } | EntryKind::AgentTurn { text, .. } => text,
        }
    }

    /// Speaker identity, `None` for system notices
    pub fn speaker(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::AgentTurn { speaker, .. } => Some(speaker),
            EntryKind::SystemNotice { .. } => None,
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self.kind, EntryKind::SystemNotice { .. })
    }
}

/// Ordered log of entries for one session
///
/// Sequence ids start at 1 and are never reused by a store, including
/// after [`TranscriptStore::clear`].
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    entries: Vec<TranscriptEntry>,
    next_seq: u64,
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 1,
        }
    }

    /// Append an entry, stamping it with the next sequence id and the current time
    pub fn append(&mut self, kind: EntryKind) -> &TranscriptEntry {
        let seq = self.next_seq;
        self.next_seq += 1;

        tracing::trace!(seq, "transcript append");
        self.entries.push(TranscriptEntry {
            seq,
            created_at: Utc::now(),
            kind,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Read-only view of the whole sequence
    pub fn read(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Only the agent turns, in order
    pub fn agent_turns(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().filter(|e| !e.is_notice())
    }
}
