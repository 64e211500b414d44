//! Tool invocation types.
//!
//! The model emits tool calls as a tool name plus a loosely-typed bag of
//! arguments ([`ToolArgs`]). The dispatcher validates that bag into a typed
//! command ([`EditorCommand`] / [`ManagerCommand`]) at the boundary, so a
//! missing or malformed field is a declared failure rather than an
//! undefined read, and completes the invocation with either a typed
//! [`CommandOutput`] or a [`CommandError`] payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vfs::{PathError, TreeError, VirtualPath};

/// The two tools the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Anthropic-style text editor tool: view, create, str_replace, insert,
    /// undo_edit.
    StrReplaceEditor,
    /// File management tool: rename, delete.
    FileManager,
}

impl ToolName {
    /// Parse a raw tool name as emitted by the model.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "str_replace_editor" => Some(Self::StrReplaceEditor),
            "file_manager" => Some(Self::FileManager),
            _ => None,
        }
    }

    /// The wire name of the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrReplaceEditor => "str_replace_editor",
            Self::FileManager => "file_manager",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool arguments exactly as the model sent them.
///
/// Every field is optional; which ones are required depends on the command.
/// Validation happens in [`EditorCommand::parse`] and
/// [`ManagerCommand::parse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolArgs {
    /// Sub-command within the tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Target path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Destination path for rename.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    /// Text to find for str_replace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_str: Option<String>,
    /// Replacement or inserted text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_str: Option<String>,
    /// Line index for insert (0 = before the first line).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_line: Option<usize>,
    /// Initial content for create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_text: Option<String>,
}

impl ToolArgs {
    fn require<'a>(
        field: &'static str,
        command: &str,
        value: Option<&'a str>,
    ) -> Result<&'a str, CommandError> {
        value.ok_or_else(|| CommandError::MissingArg {
            command: command.to_string(),
            field,
        })
    }

    fn require_path(&self, command: &str) -> Result<VirtualPath, CommandError> {
        let raw = Self::require("path", command, self.path.as_deref())?;
        Ok(VirtualPath::parse(raw)?)
    }
}

/// Validated `str_replace_editor` command.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Return the current content of a file.
    View {
        /// File to read.
        path: VirtualPath,
    },
    /// Create a new file.
    Create {
        /// Path the file will live at.
        path: VirtualPath,
        /// Initial content.
        file_text: String,
    },
    /// Replace a uniquely-occurring string.
    StrReplace {
        /// File to edit.
        path: VirtualPath,
        /// Text that must occur exactly once.
        old_str: String,
        /// Replacement text.
        new_str: String,
    },
    /// Insert text after a line index.
    Insert {
        /// File to edit.
        path: VirtualPath,
        /// Line index to insert after; 0 inserts before the first line.
        insert_line: usize,
        /// Text to insert.
        new_str: String,
    },
    /// Restore the previous content of a file.
    UndoEdit {
        /// File to revert.
        path: VirtualPath,
    },
}

impl EditorCommand {
    /// Validate loosely-typed arguments into a typed editor command.
    pub fn parse(args: &ToolArgs) -> Result<Self, CommandError> {
        let command = args.command.as_deref().ok_or_else(|| CommandError::MissingArg {
            command: ToolName::StrReplaceEditor.to_string(),
            field: "command",
        })?;
        match command {
            "view" => Ok(Self::View {
                path: args.require_path(command)?,
            }),
            "create" => Ok(Self::Create {
                path: args.require_path(command)?,
                file_text: ToolArgs::require("file_text", command, args.file_text.as_deref())?
                    .to_string(),
            }),
            "str_replace" => Ok(Self::StrReplace {
                path: args.require_path(command)?,
                old_str: ToolArgs::require("old_str", command, args.old_str.as_deref())?
                    .to_string(),
                new_str: ToolArgs::require("new_str", command, args.new_str.as_deref())?
                    .to_string(),
            }),
            "insert" => Ok(Self::Insert {
                path: args.require_path(command)?,
                insert_line: args.insert_line.ok_or_else(|| CommandError::MissingArg {
                    command: command.to_string(),
                    field: "insert_line",
                })?,
                new_str: ToolArgs::require("new_str", command, args.new_str.as_deref())?
                    .to_string(),
            }),
            "undo_edit" => Ok(Self::UndoEdit {
                path: args.require_path(command)?,
            }),
            other => Err(CommandError::Unrecognized {
                tool: ToolName::StrReplaceEditor,
                command: other.to_string(),
            }),
        }
    }
}

/// Validated `file_manager` command.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerCommand {
    /// Move a file to a new path.
    Rename {
        /// Current path.
        path: VirtualPath,
        /// Destination; a missing destination is treated as a no-op rename
        /// that still reports success.
        new_path: Option<VirtualPath>,
    },
    /// Remove a file.
    Delete {
        /// File to remove.
        path: VirtualPath,
    },
}

impl ManagerCommand {
    /// Validate loosely-typed arguments into a typed manager command.
    pub fn parse(args: &ToolArgs) -> Result<Self, CommandError> {
        let command = args.command.as_deref().ok_or_else(|| CommandError::MissingArg {
            command: ToolName::FileManager.to_string(),
            field: "command",
        })?;
        match command {
            "rename" => Ok(Self::Rename {
                path: args.require_path(command)?,
                new_path: args
                    .new_path
                    .as_deref()
                    .map(VirtualPath::parse)
                    .transpose()?,
            }),
            "delete" => Ok(Self::Delete {
                path: args.require_path(command)?,
            }),
            other => Err(CommandError::Unrecognized {
                tool: ToolName::FileManager,
                command: other.to_string(),
            }),
        }
    }
}

/// Failure payload of a completed invocation.
///
/// Every variant is recoverable-by-design: the dispatcher delivers it as a
/// completed result rather than raising, so a bad tool call never blocks
/// the conversation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    /// The target path was malformed.
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
    /// The underlying tree operation failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// A required argument was absent.
    #[error("`{field}` is required for {command}")]
    MissingArg {
        /// Command (or tool, when the command itself is missing) being parsed.
        command: String,
        /// Name of the absent field.
        field: &'static str,
    },
    /// `old_str` did not occur in the file.
    #[error("no occurrence of old_str in {path}")]
    ZeroOccurrences {
        /// File that was searched.
        path: VirtualPath,
    },
    /// `old_str` occurred more than once; replacing would be a guess.
    #[error("{count} occurrences of old_str in {path}; replacement must be unambiguous")]
    MultipleOccurrences {
        /// File that was searched.
        path: VirtualPath,
        /// How many occurrences were found.
        count: usize,
    },
    /// `insert_line` was past the end of the file.
    #[error("insert_line {line} out of range for {path} ({line_count} lines)")]
    LineOutOfRange {
        /// File that was targeted.
        path: VirtualPath,
        /// Requested line index.
        line: usize,
        /// Number of lines in the file.
        line_count: usize,
    },
    /// The command is not in the tool's dispatch table.
    #[error("unrecognized command `{command}` for {tool}")]
    Unrecognized {
        /// Tool that was invoked.
        tool: ToolName,
        /// Raw command string.
        command: String,
    },
    /// The tool name itself is unknown.
    #[error("unknown tool: {tool}")]
    UnknownTool {
        /// Raw tool name as emitted by the model.
        tool: String,
    },
}

/// Typed success payload of a completed invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutput {
    /// `view` succeeded.
    Viewed {
        /// File that was read.
        path: VirtualPath,
        /// Its current content.
        content: String,
    },
    /// `create` succeeded.
    Created {
        /// File that was created.
        path: VirtualPath,
    },
    /// `str_replace` succeeded.
    Replaced {
        /// File that was edited.
        path: VirtualPath,
    },
    /// `insert` succeeded.
    Inserted {
        /// File that was edited.
        path: VirtualPath,
        /// Line index the text was inserted after.
        line: usize,
    },
    /// `undo_edit` succeeded.
    Reverted {
        /// File that was restored.
        path: VirtualPath,
    },
    /// `rename` succeeded. For a no-op rename (no destination given) the
    /// two paths are equal.
    Renamed {
        /// Original path.
        path: VirtualPath,
        /// Path after the rename.
        new_path: VirtualPath,
    },
    /// `delete` succeeded.
    Deleted {
        /// File that was removed.
        path: VirtualPath,
    },
}

/// Whether an invocation is still awaiting resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationState {
    /// Awaiting upstream model resolution.
    Pending,
    /// Resolved, successfully or not.
    Complete,
}

/// Outcome attached to a completed invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvocationResult {
    /// The command applied cleanly.
    Ok(CommandOutput),
    /// The command failed in a well-defined way.
    Err {
        /// Human- and model-readable description of the failure.
        error: String,
    },
}

impl InvocationResult {
    /// Whether this is a success payload.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

impl From<Result<CommandOutput, CommandError>> for InvocationResult {
    fn from(result: Result<CommandOutput, CommandError>) -> Self {
        match result {
            Ok(output) => Self::Ok(output),
            Err(err) => Self::Err {
                error: err.to_string(),
            },
        }
    }
}

/// A single tool call and its resolution, as shown to the UI.
///
/// Immutable once completed by the dispatcher; consumers only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Raw tool name as emitted by the model.
    pub tool: String,
    /// Arguments exactly as the model sent them.
    pub args: ToolArgs,
    /// Resolution state.
    pub state: InvocationState,
    /// Present iff `state` is [`InvocationState::Complete`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<InvocationResult>,
}

impl ToolInvocation {
    /// An invocation still streaming in from the model.
    pub fn pending(tool: impl Into<String>, args: ToolArgs) -> Self {
        Self {
            tool: tool.into(),
            args,
            state: InvocationState::Pending,
            result: None,
        }
    }

    /// A resolved invocation carrying its result payload.
    pub fn completed(
        tool: impl Into<String>,
        args: ToolArgs,
        result: InvocationResult,
    ) -> Self {
        Self {
            tool: tool.into(),
            args,
            state: InvocationState::Complete,
            result: Some(result),
        }
    }

    /// Whether the invocation has resolved with a result.
    ///
    /// Drives the UI's spinner/done indicator.
    pub fn is_complete(&self) -> bool {
        self.state == InvocationState::Complete && self.result.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(command: &str, path: &str) -> ToolArgs {
        ToolArgs {
            command: Some(command.to_string()),
            path: Some(path.to_string()),
            ..ToolArgs::default()
        }
    }

    #[test]
    fn test_tool_name_round_trip() {
        assert_eq!(
            ToolName::parse("str_replace_editor"),
            Some(ToolName::StrReplaceEditor)
        );
        assert_eq!(ToolName::parse("file_manager"), Some(ToolName::FileManager));
        assert_eq!(ToolName::parse("web_search"), None);
        assert_eq!(ToolName::StrReplaceEditor.as_str(), "str_replace_editor");
    }

    #[test]
    fn test_tool_args_deserialize_with_missing_fields() {
        let parsed: ToolArgs =
            serde_json::from_str(r#"{"command": "view", "path": "/App.jsx"}"#).expect("parse");
        assert_eq!(parsed.command.as_deref(), Some("view"));
        assert_eq!(parsed.path.as_deref(), Some("/App.jsx"));
        assert!(parsed.old_str.is_none());
        assert!(parsed.insert_line.is_none());
    }

    #[test]
    fn test_tool_args_skip_none_on_serialize() {
        let json = serde_json::to_string(&args("view", "/App.jsx")).expect("serialize");
        assert_eq!(json, r#"{"command":"view","path":"/App.jsx"}"#);
    }

    #[test]
    fn test_editor_parse_view() {
        let command = EditorCommand::parse(&args("view", "/App.jsx")).expect("parse");
        assert_eq!(
            command,
            EditorCommand::View {
                path: VirtualPath::parse("/App.jsx").expect("path"),
            }
        );
    }

    #[test]
    fn test_editor_parse_missing_command() {
        let err = EditorCommand::parse(&ToolArgs::default());
        assert_eq!(
            err,
            Err(CommandError::MissingArg {
                command: "str_replace_editor".to_string(),
                field: "command",
            })
        );
    }

    #[test]
    fn test_editor_parse_missing_path() {
        let bare = ToolArgs {
            command: Some("view".to_string()),
            ..ToolArgs::default()
        };
        assert_eq!(
            EditorCommand::parse(&bare),
            Err(CommandError::MissingArg {
                command: "view".to_string(),
                field: "path",
            })
        );
    }

    #[test]
    fn test_editor_parse_create_requires_file_text() {
        assert_eq!(
            EditorCommand::parse(&args("create", "/App.jsx")),
            Err(CommandError::MissingArg {
                command: "create".to_string(),
                field: "file_text",
            })
        );
    }

    #[test]
    fn test_editor_parse_str_replace_requires_both_strings() {
        let mut partial = args("str_replace", "/App.jsx");
        partial.old_str = Some("x".to_string());
        assert_eq!(
            EditorCommand::parse(&partial),
            Err(CommandError::MissingArg {
                command: "str_replace".to_string(),
                field: "new_str",
            })
        );
    }

    #[test]
    fn test_editor_parse_insert_requires_line() {
        let mut partial = args("insert", "/App.jsx");
        partial.new_str = Some("x".to_string());
        assert_eq!(
            EditorCommand::parse(&partial),
            Err(CommandError::MissingArg {
                command: "insert".to_string(),
                field: "insert_line",
            })
        );
    }

    #[test]
    fn test_editor_parse_invalid_path() {
        let err = EditorCommand::parse(&args("view", "App.jsx")).expect_err("should fail");
        assert!(matches!(err, CommandError::Path(PathError::Relative(_))));
    }

    #[test]
    fn test_editor_parse_unrecognized_command() {
        assert_eq!(
            EditorCommand::parse(&args("format", "/App.jsx")),
            Err(CommandError::Unrecognized {
                tool: ToolName::StrReplaceEditor,
                command: "format".to_string(),
            })
        );
    }

    #[test]
    fn test_manager_parse_rename_without_destination() {
        let command = ManagerCommand::parse(&args("rename", "/App.jsx")).expect("parse");
        assert_eq!(
            command,
            ManagerCommand::Rename {
                path: VirtualPath::parse("/App.jsx").expect("path"),
                new_path: None,
            }
        );
    }

    #[test]
    fn test_manager_parse_rename_with_destination() {
        let mut full = args("rename", "/App.jsx");
        full.new_path = Some("/Main.jsx".to_string());
        let command = ManagerCommand::parse(&full).expect("parse");
        assert_eq!(
            command,
            ManagerCommand::Rename {
                path: VirtualPath::parse("/App.jsx").expect("path"),
                new_path: Some(VirtualPath::parse("/Main.jsx").expect("path")),
            }
        );
    }

    #[test]
    fn test_invocation_result_untagged_serialization() {
        let ok = InvocationResult::Ok(CommandOutput::Created {
            path: VirtualPath::parse("/App.jsx").expect("path"),
        });
        let json = serde_json::to_string(&ok).expect("serialize");
        assert_eq!(json, r#"{"kind":"created","path":"/App.jsx"}"#);

        let err = InvocationResult::Err {
            error: "file not found: /App.jsx".to_string(),
        };
        let json = serde_json::to_string(&err).expect("serialize");
        assert_eq!(json, r#"{"error":"file not found: /App.jsx"}"#);
    }

    #[test]
    fn test_invocation_completion() {
        let pending = ToolInvocation::pending("str_replace_editor", args("view", "/App.jsx"));
        assert!(!pending.is_complete());
        assert_eq!(pending.state, InvocationState::Pending);

        let done = ToolInvocation::completed(
            "str_replace_editor",
            args("view", "/App.jsx"),
            InvocationResult::Err {
                error: "oops".to_string(),
            },
        );
        assert!(done.is_complete());
    }
}
