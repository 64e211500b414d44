//! A live editing session.
//!
//! [`ChatSession`] ties the engine together for one conversation: it owns
//! the file tree behind an async mutex, applies tool calls strictly in the
//! order they arrive, keeps the transcript, and — while no project identity
//! exists — mirrors every transcript change into the session's
//! [`AnonWorkTracker`].
//!
//! The mutex is the mutual-exclusion boundary required by the
//! read-modify-write commands (`str_replace`, `insert`): a second caller
//! queues behind an in-flight command instead of interleaving with it.
//! Snapshots are atomic copies, so serialization for an outbound model
//! request never observes a partial edit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::anon::{AnonWorkTracker, TranscriptEntry};
use crate::dispatch::{Dispatcher, ToolArgs, ToolInvocation};
use crate::vfs::{FileMap, FileTree};

/// Context attached to every outbound model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequestContext {
    /// Serialized ground truth of the project tree.
    pub files: FileMap,
    /// Project identity, if the session is bound to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Builder for a [`ChatSession`].
#[derive(Debug, Default)]
pub struct ChatSessionBuilder {
    project_id: Option<String>,
    tracker: Option<Arc<AnonWorkTracker>>,
    files: Option<FileMap>,
    messages: Vec<TranscriptEntry>,
}

impl ChatSessionBuilder {
    /// Bind the session to a persisted project.
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Share an anonymous-work tracker with the session.
    ///
    /// Only consulted while no project id is set.
    pub fn tracker(mut self, tracker: Arc<AnonWorkTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Seed the tree from a previously serialized file map.
    pub fn files(mut self, files: FileMap) -> Self {
        self.files = Some(files);
        self
    }

    /// Seed the transcript, e.g. when reopening a persisted project.
    pub fn messages(mut self, messages: impl IntoIterator<Item = TranscriptEntry>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Build the session.
    pub fn build(self) -> ChatSession {
        let tree = self.files.map(FileTree::from_files).unwrap_or_default();
        ChatSession {
            tree: Mutex::new(tree),
            transcript: Mutex::new(self.messages),
            project_id: self.project_id,
            tracker: self.tracker,
            dispatcher: Dispatcher::new(),
        }
    }
}

/// One conversation's file tree, transcript, and dispatcher.
#[derive(Debug)]
pub struct ChatSession {
    tree: Mutex<FileTree>,
    transcript: Mutex<Vec<TranscriptEntry>>,
    project_id: Option<String>,
    tracker: Option<Arc<AnonWorkTracker>>,
    dispatcher: Dispatcher,
}

impl ChatSession {
    /// Start building a session.
    pub fn builder() -> ChatSessionBuilder {
        ChatSessionBuilder::default()
    }

    /// A fresh anonymous session with an empty tree.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Project identity this session is bound to, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Apply one tool call, queueing behind any in-flight command.
    pub async fn apply(&self, tool: &str, args: ToolArgs) -> ToolInvocation {
        let mut tree = self.tree.lock().await;
        self.dispatcher.dispatch(&mut tree, tool, args)
    }

    /// Append a user message to the transcript.
    pub async fn push_user(&self, content: impl Into<String>) {
        self.push(TranscriptEntry::user(content)).await;
    }

    /// Append an assistant message to the transcript.
    pub async fn push_assistant(&self, content: impl Into<String>) {
        self.push(TranscriptEntry::assistant(content)).await;
    }

    async fn push(&self, entry: TranscriptEntry) {
        let messages = {
            let mut transcript = self.transcript.lock().await;
            transcript.push(entry);
            transcript.clone()
        };
        // While the session has no project identity, every transcript change
        // refreshes the anonymous-work snapshot.
        if self.project_id.is_none()
            && !messages.is_empty()
            && let Some(tracker) = &self.tracker
        {
            tracker.record(messages, self.snapshot().await);
        }
    }

    /// Atomic serialized copy of the current tree.
    pub async fn snapshot(&self) -> FileMap {
        FileMap::capture(&*self.tree.lock().await)
    }

    /// Copy of the current transcript.
    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().await.clone()
    }

    /// Assemble the context attached to the next outbound model request.
    pub async fn request_context(&self) -> ModelRequestContext {
        ModelRequestContext {
            files: self.snapshot().await,
            project_id: self.project_id.clone(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
