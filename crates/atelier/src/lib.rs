//! Atelier: virtual filesystem and tool-call execution engine for an AI
//! design assistant.
//!
//! A language model edits a project by emitting structured tool calls
//! (`str_replace_editor`, `file_manager`); Atelier validates each call,
//! applies it to an in-memory path-addressed file tree with per-file undo,
//! and serializes the tree back to the model as ground truth on every turn.
//! Work done before authentication is captured per session and used to seed
//! a persisted project on sign-in.

pub mod dispatch;
pub mod session;
pub mod vfs;

pub use dispatch::{
    ActionKind, Badge, CommandError, CommandOutput, Dispatcher, InvocationResult,
    InvocationState, ToolArgs, ToolInvocation, ToolName,
};
pub use session::{AnonWorkTracker, ChatSession, ModelRequestContext, TranscriptEntry};
pub use vfs::{FileMap, FileTree, PathError, TreeError, VirtualPath};
