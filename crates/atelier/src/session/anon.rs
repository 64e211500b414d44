//! Anonymous work tracking.
//!
//! Before a user authenticates there is no project to persist to, but the
//! conversation and file tree still accumulate state worth keeping. The
//! [`AnonWorkTracker`] holds the latest transcript + serialized tree for the
//! session; once authentication succeeds the snapshot is consumed exactly
//! once to seed a real project (see [`crate::session::resolve_landing`]).
//!
//! The tracker is an injected, session-scoped value — construct one per
//! session and share it via `Arc`, rather than reaching for process-global
//! state.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::vfs::FileMap;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The human in the conversation.
    User,
    /// The model.
    Assistant,
}

/// One message in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Author of the message.
    pub role: Role,
    /// Message content.
    pub content: String,
}

impl TranscriptEntry {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Conversation and file-tree state captured before authentication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonWorkSnapshot {
    /// Transcript at capture time.
    pub messages: Vec<TranscriptEntry>,
    /// Serialized file tree at capture time.
    pub files: FileMap,
}

/// Session-scoped cache of the latest anonymous work.
#[derive(Debug, Default)]
pub struct AnonWorkTracker {
    slot: Mutex<Option<AnonWorkSnapshot>>,
}

impl AnonWorkTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the held snapshot. Last write wins; there is no merging.
    pub fn record(&self, messages: Vec<TranscriptEntry>, files: FileMap) {
        *self.lock() = Some(AnonWorkSnapshot { messages, files });
    }

    /// Take the snapshot, clearing the slot.
    ///
    /// Call at most once per authentication event; a second call returns
    /// `None` rather than resurrecting stale work.
    pub fn consume(&self) -> Option<AnonWorkSnapshot> {
        self.lock().take()
    }

    /// Drop any held snapshot.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Whether a snapshot with at least one message is held.
    pub fn has_work(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|snapshot| !snapshot.messages.is_empty())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AnonWorkSnapshot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
