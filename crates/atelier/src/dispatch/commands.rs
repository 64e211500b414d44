//! Command dispatch against the file tree.
//!
//! [`Dispatcher::dispatch`] is a pure mapping from `(tool, command, args)`
//! to a completed [`ToolInvocation`]: validation at the boundary, then an
//! exhaustive match routing each typed command to its own function. A
//! structured failure is still a completed result carrying an error
//! payload; only awaiting upstream model resolution leaves an invocation
//! pending.

use tracing::{debug, warn};

use super::invocation::{
    CommandError, CommandOutput, EditorCommand, InvocationResult, ManagerCommand, ToolArgs,
    ToolInvocation, ToolName,
};
use crate::vfs::{FileTree, VirtualPath};

/// Routes validated tool calls to mutations or queries on a [`FileTree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Resolve one tool call against `tree`.
    ///
    /// Always returns a completed invocation; malformed input, unknown
    /// tools, and failed tree operations all surface as error payloads
    /// rather than panics, so the conversation can continue.
    pub fn dispatch(&self, tree: &mut FileTree, tool: &str, args: ToolArgs) -> ToolInvocation {
        debug!(tool, command = args.command.as_deref(), "dispatching tool call");
        let result = self.execute(tree, tool, &args);
        if let Err(error) = &result {
            warn!(tool, %error, "tool call failed");
        }
        ToolInvocation::completed(tool, args, InvocationResult::from(result))
    }

    /// Resolve a pending invocation into its completed form.
    ///
    /// Already-completed invocations pass through unchanged; they are
    /// immutable once resolved.
    pub fn resolve(&self, tree: &mut FileTree, invocation: ToolInvocation) -> ToolInvocation {
        if invocation.is_complete() {
            return invocation;
        }
        let ToolInvocation { tool, args, .. } = invocation;
        self.dispatch(tree, &tool, args)
    }

    fn execute(
        &self,
        tree: &mut FileTree,
        tool: &str,
        args: &ToolArgs,
    ) -> Result<CommandOutput, CommandError> {
        match ToolName::parse(tool) {
            Some(ToolName::StrReplaceEditor) => match EditorCommand::parse(args)? {
                EditorCommand::View { path } => view(tree, path),
                EditorCommand::Create { path, file_text } => create(tree, path, file_text),
                EditorCommand::StrReplace {
                    path,
                    old_str,
                    new_str,
                } => str_replace(tree, path, &old_str, &new_str),
                EditorCommand::Insert {
                    path,
                    insert_line,
                    new_str,
                } => insert(tree, path, insert_line, &new_str),
                EditorCommand::UndoEdit { path } => undo_edit(tree, path),
            },
            Some(ToolName::FileManager) => match ManagerCommand::parse(args)? {
                ManagerCommand::Rename { path, new_path } => rename(tree, path, new_path),
                ManagerCommand::Delete { path } => delete(tree, path),
            },
            None => Err(CommandError::UnknownTool {
                tool: tool.to_string(),
            }),
        }
    }
}

fn view(tree: &FileTree, path: VirtualPath) -> Result<CommandOutput, CommandError> {
    let content = tree.read(&path)?.to_string();
    Ok(CommandOutput::Viewed { path, content })
}

fn create(
    tree: &mut FileTree,
    path: VirtualPath,
    file_text: String,
) -> Result<CommandOutput, CommandError> {
    tree.create(path.clone(), file_text)?;
    Ok(CommandOutput::Created { path })
}

/// Replace `old_str` with `new_str`, requiring exactly one occurrence.
///
/// Zero occurrences means the model is editing stale content; more than one
/// means the edit is ambiguous. Both reject without touching the file —
/// silently picking an occurrence would corrupt source invisibly.
fn str_replace(
    tree: &mut FileTree,
    path: VirtualPath,
    old_str: &str,
    new_str: &str,
) -> Result<CommandOutput, CommandError> {
    let content = tree.read(&path)?;
    let count = content.matches(old_str).count();
    match count {
        0 => Err(CommandError::ZeroOccurrences { path }),
        1 => {
            let updated = content.replacen(old_str, new_str, 1);
            tree.write(path.clone(), updated);
            Ok(CommandOutput::Replaced { path })
        }
        count => Err(CommandError::MultipleOccurrences { path, count }),
    }
}

/// Insert `new_str` after line index `insert_line`; 0 inserts before the
/// first line.
fn insert(
    tree: &mut FileTree,
    path: VirtualPath,
    insert_line: usize,
    new_str: &str,
) -> Result<CommandOutput, CommandError> {
    let content = tree.read(&path)?;
    // split('\n') rather than lines(): a trailing newline stays a trailing
    // empty segment, so rejoining preserves it.
    let mut lines: Vec<&str> = content.split('\n').collect();
    if insert_line > lines.len() {
        return Err(CommandError::LineOutOfRange {
            path,
            line: insert_line,
            line_count: lines.len(),
        });
    }
    lines.insert(insert_line, new_str);
    let updated = lines.join("\n");
    tree.write(path.clone(), updated);
    Ok(CommandOutput::Inserted {
        path,
        line: insert_line,
    })
}

fn undo_edit(tree: &mut FileTree, path: VirtualPath) -> Result<CommandOutput, CommandError> {
    tree.undo(&path)?;
    Ok(CommandOutput::Reverted { path })
}

/// Rename a file. A missing destination is a no-op that still reports
/// success, matching what callers send when they only know the source.
fn rename(
    tree: &mut FileTree,
    path: VirtualPath,
    new_path: Option<VirtualPath>,
) -> Result<CommandOutput, CommandError> {
    match new_path {
        Some(new_path) => {
            tree.rename(&path, new_path.clone())?;
            Ok(CommandOutput::Renamed { path, new_path })
        }
        None => Ok(CommandOutput::Renamed {
            new_path: path.clone(),
            path,
        }),
    }
}

fn delete(tree: &mut FileTree, path: VirtualPath) -> Result<CommandOutput, CommandError> {
    tree.delete(&path)?;
    Ok(CommandOutput::Deleted { path })
}
