//! Human-readable labels for tool invocations.
//!
//! The UI renders each invocation as a small badge: a short description plus
//! an icon chosen by action kind, with a spinner while pending and a done
//! marker once [`ToolInvocation::is_complete`] holds. Formatting is
//! deliberately tolerant: missing arguments or an unknown command fall back
//! to a literal rendering instead of blocking the conversation.

use serde::{Deserialize, Serialize};

use super::invocation::{ToolArgs, ToolInvocation, ToolName};

/// Icon category for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Reading a file.
    View,
    /// Creating a file.
    Create,
    /// Editing file content.
    Edit,
    /// Undoing an edit.
    Revert,
    /// Moving a file.
    Rename,
    /// Removing a file.
    Delete,
    /// Anything the formatter does not recognize.
    Unknown,
}

/// A formatted badge: label text plus icon category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Display text, e.g. `Editing /App.jsx`.
    pub text: String,
    /// Icon category.
    pub kind: ActionKind,
}

impl Badge {
    /// Format a badge for a raw tool name and its arguments.
    pub fn describe(tool: &str, args: &ToolArgs) -> Self {
        let fallback = Self {
            text: tool.to_string(),
            kind: ActionKind::Unknown,
        };

        let (Some(command), Some(path)) = (args.command.as_deref(), args.path.as_deref()) else {
            return fallback;
        };

        match ToolName::parse(tool) {
            Some(ToolName::StrReplaceEditor) => match command {
                "view" => Self::new(format!("Viewing {path}"), ActionKind::View),
                "create" => Self::new(format!("Creating {path}"), ActionKind::Create),
                "str_replace" | "insert" => {
                    Self::new(format!("Editing {path}"), ActionKind::Edit)
                }
                "undo_edit" => {
                    Self::new(format!("Reverting changes to {path}"), ActionKind::Revert)
                }
                other => Self::new(format!("{other} {path}"), ActionKind::Unknown),
            },
            Some(ToolName::FileManager) => match command {
                "rename" => match args.new_path.as_deref() {
                    Some(new_path) => {
                        Self::new(format!("Renaming {path} to {new_path}"), ActionKind::Rename)
                    }
                    None => Self::new(format!("Renaming {path}"), ActionKind::Rename),
                },
                "delete" => Self::new(format!("Deleting {path}"), ActionKind::Delete),
                other => Self::new(format!("{other} {path}"), ActionKind::Unknown),
            },
            None => fallback,
        }
    }

    /// Format a badge for an invocation record.
    pub fn for_invocation(invocation: &ToolInvocation) -> Self {
        Self::describe(&invocation.tool, &invocation.args)
    }

    fn new(text: String, kind: ActionKind) -> Self {
        Self { text, kind }
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
    fn test_view_badge() {
        let badge = Badge::describe("str_replace_editor", &args("view", "/App.jsx"));
        assert_eq!(badge.text, "Viewing /App.jsx");
        assert_eq!(badge.kind, ActionKind::View);
    }

    #[test]
    fn test_create_badge() {
        let badge = Badge::describe("str_replace_editor", &args("create", "/components/Nav.jsx"));
        assert_eq!(badge.text, "Creating /components/Nav.jsx");
        assert_eq!(badge.kind, ActionKind::Create);
    }

    #[test]
    fn test_str_replace_and_insert_both_read_as_editing() {
        let replace = Badge::describe("str_replace_editor", &args("str_replace", "/App.jsx"));
        assert_eq!(replace.text, "Editing /App.jsx");
        assert_eq!(replace.kind, ActionKind::Edit);

        let insert = Badge::describe("str_replace_editor", &args("insert", "/App.jsx"));
        assert_eq!(insert.text, "Editing /App.jsx");
        assert_eq!(insert.kind, ActionKind::Edit);
    }

    #[test]
    fn test_undo_edit_badge() {
        let badge = Badge::describe("str_replace_editor", &args("undo_edit", "/App.jsx"));
        assert_eq!(badge.text, "Reverting changes to /App.jsx");
        assert_eq!(badge.kind, ActionKind::Revert);
    }

    #[test]
    fn test_rename_badge_with_destination() {
        let mut rename = args("rename", "/App.jsx");
        rename.new_path = Some("/Main.jsx".to_string());
        let badge = Badge::describe("file_manager", &rename);
        assert_eq!(badge.text, "Renaming /App.jsx to /Main.jsx");
        assert_eq!(badge.kind, ActionKind::Rename);
    }

    #[test]
    fn test_rename_badge_tolerates_missing_destination() {
        let badge = Badge::describe("file_manager", &args("rename", "/App.jsx"));
        assert_eq!(badge.text, "Renaming /App.jsx");
        assert_eq!(badge.kind, ActionKind::Rename);
    }

    #[test]
    fn test_delete_badge() {
        let badge = Badge::describe("file_manager", &args("delete", "/old.jsx"));
        assert_eq!(badge.text, "Deleting /old.jsx");
        assert_eq!(badge.kind, ActionKind::Delete);
    }

    #[test]
    fn test_unknown_command_renders_literally() {
        let badge = Badge::describe("str_replace_editor", &args("format", "/App.jsx"));
        assert_eq!(badge.text, "format /App.jsx");
        assert_eq!(badge.kind, ActionKind::Unknown);

        let badge = Badge::describe("file_manager", &args("archive", "/App.jsx"));
        assert_eq!(badge.text, "archive /App.jsx");
        assert_eq!(badge.kind, ActionKind::Unknown);
    }

    #[test]
    fn test_missing_command_or_path_falls_back_to_tool_name() {
        let badge = Badge::describe("str_replace_editor", &ToolArgs::default());
        assert_eq!(badge.text, "str_replace_editor");
        assert_eq!(badge.kind, ActionKind::Unknown);

        let only_command = ToolArgs {
            command: Some("view".to_string()),
            ..ToolArgs::default()
        };
        let badge = Badge::describe("str_replace_editor", &only_command);
        assert_eq!(badge.text, "str_replace_editor");
    }

    #[test]
    fn test_unknown_tool_falls_back_to_tool_name() {
        let badge = Badge::describe("web_search", &args("query", "/whatever"));
        assert_eq!(badge.text, "web_search");
        assert_eq!(badge.kind, ActionKind::Unknown);
    }
}
