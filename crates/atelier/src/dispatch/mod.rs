//! Tool-call dispatch.
//!
//! One tool call flows through three stages:
//!
//! 1. [`ToolArgs`] — the loosely-typed fields as the model sent them;
//! 2. [`EditorCommand`] / [`ManagerCommand`] — the validated, typed command
//!    (the dispatch boundary);
//! 3. [`ToolInvocation`] — the completed record carrying a typed
//!    [`CommandOutput`] or a structured error payload.
//!
//! [`Badge`] formats invocations for display.

mod commands;
mod invocation;
mod label;

pub use commands::Dispatcher;
pub use invocation::{
    CommandError, CommandOutput, EditorCommand, InvocationResult, InvocationState,
    ManagerCommand, ToolArgs, ToolInvocation, ToolName,
};
pub use label::{ActionKind, Badge};
