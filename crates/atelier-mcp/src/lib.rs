//! Atelier MCP Server
//!
//! An MCP server that exposes the Atelier editing tools to any MCP-capable
//! model client. Tool calls mutate a per-server in-memory project tree;
//! the `project_files` tool returns the serialized tree so the client can
//! hand the model its ground truth on every turn.

use std::sync::Arc;

use atelier::{Badge, ChatSession, ToolArgs};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::*,
    schemars::{self, JsonSchema},
    service::{RequestContext, RoleServer},
};
use serde::{Deserialize, Serialize};

/// Parameters for the `str_replace_editor` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditorParams {
    /// One of: view, create, str_replace, insert, undo_edit.
    pub command: String,

    /// Absolute path of the target file, e.g. `/App.jsx`.
    pub path: String,

    /// Initial content (create).
    #[serde(default)]
    pub file_text: Option<String>,

    /// Text to find; must occur exactly once (str_replace).
    #[serde(default)]
    pub old_str: Option<String>,

    /// Replacement or inserted text (str_replace, insert).
    #[serde(default)]
    pub new_str: Option<String>,

    /// Line index to insert after; 0 inserts before the first line (insert).
    #[serde(default)]
    pub insert_line: Option<usize>,
}

/// Parameters for the `file_manager` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ManagerParams {
    /// One of: rename, delete.
    pub command: String,

    /// Absolute path of the target file.
    pub path: String,

    /// Destination path (rename).
    #[serde(default)]
    pub new_path: Option<String>,
}

impl From<EditorParams> for ToolArgs {
    fn from(params: EditorParams) -> Self {
        ToolArgs {
            command: Some(params.command),
            path: Some(params.path),
            file_text: params.file_text,
            old_str: params.old_str,
            new_str: params.new_str,
            insert_line: params.insert_line,
            ..ToolArgs::default()
        }
    }
}

impl From<ManagerParams> for ToolArgs {
    fn from(params: ManagerParams) -> Self {
        ToolArgs {
            command: Some(params.command),
            path: Some(params.path),
            new_path: params.new_path,
            ..ToolArgs::default()
        }
    }
}

/// MCP server holding one editing session.
#[derive(Clone)]
pub struct AtelierServer {
    session: Arc<ChatSession>,
}

impl std::fmt::Debug for AtelierServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtelierServer").finish_non_exhaustive()
    }
}

impl Default for AtelierServer {
    fn default() -> Self {
        Self::new()
    }
}

impl AtelierServer {
    /// Create a server with an empty project tree.
    pub fn new() -> Self {
        Self {
            session: Arc::new(ChatSession::new()),
        }
    }

    /// Apply one tool call and format the result for the model.
    async fn apply(&self, tool: &str, args: ToolArgs) -> Result<CallToolResult, McpError> {
        let invocation = self.session.apply(tool, args).await;
        let badge = Badge::for_invocation(&invocation);

        let result_json = serde_json::to_string_pretty(&invocation.result)
            .map_err(|e| McpError::internal_error(format!("serialize result: {e}"), None))?;

        let succeeded = invocation.result.as_ref().is_some_and(|r| r.is_ok());
        let output = format!("{}\n{}", badge.text, result_json);

        if succeeded {
            Ok(CallToolResult::success(vec![Content::text(output)]))
        } else {
            // Well-defined failures still complete; surface them to the
            // model as tool output rather than a protocol error.
            Ok(CallToolResult::error(vec![Content::text(output)]))
        }
    }

    async fn project_files(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.session.snapshot().await;
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| McpError::internal_error(format!("serialize files: {e}"), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    fn editor_tool(&self) -> Tool {
        let schema = schemars::schema_for!(EditorParams);
        Self::tool(
            "str_replace_editor",
            "View, create, and edit files in the virtual project tree. Commands: view, \
            create (file_text), str_replace (old_str must occur exactly once, new_str), \
            insert (insert_line, new_str), undo_edit.",
            serde_json::to_value(schema).unwrap_or_default(),
        )
    }

    fn manager_tool(&self) -> Tool {
        let schema = schemars::schema_for!(ManagerParams);
        Self::tool(
            "file_manager",
            "Rename or delete files in the virtual project tree. Commands: rename \
            (new_path), delete.",
            serde_json::to_value(schema).unwrap_or_default(),
        )
    }

    fn files_tool(&self) -> Tool {
        Self::tool(
            "project_files",
            "Return the serialized project tree as a JSON object mapping each file path \
            to its current content.",
            serde_json::Value::Object(serde_json::Map::new()),
        )
    }

    fn tool(name: &'static str, description: &'static str, schema_json: serde_json::Value) -> Tool {
        let input_schema = match schema_json {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: name.into(),
            title: None,
            description: Some(description.into()),
            input_schema,
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        }
    }
}

impl ServerHandler for AtelierServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Atelier maintains an in-memory virtual project tree. Use 'str_replace_editor' \
                to view, create, and edit files (str_replace requires old_str to occur exactly \
                once; undo_edit reverts the latest edit), 'file_manager' to rename or delete \
                files, and 'project_files' to read the full path-to-content map of the tree."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: vec![self.editor_tool(), self.manager_tool(), self.files_tool()],
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        match request.name.as_ref() {
            "str_replace_editor" => {
                let params: EditorParams = serde_json::from_value(arguments)
                    .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {e}"), None))?;
                self.apply("str_replace_editor", params.into()).await
            }
            "file_manager" => {
                let params: ManagerParams = serde_json::from_value(arguments)
                    .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {e}"), None))?;
                self.apply("file_manager", params.into()).await
            }
            "project_files" => self.project_files().await,
            _ => Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_params_minimal() {
        let json = r#"{"command": "view", "path": "/App.jsx"}"#;
        let params: EditorParams = serde_json::from_str(json).expect("parse failed");
        assert_eq!(params.command, "view");
        assert_eq!(params.path, "/App.jsx");
        assert!(params.file_text.is_none());
        assert!(params.insert_line.is_none());
    }

    #[test]
    fn test_editor_params_into_args() {
        let json = r#"{"command": "str_replace", "path": "/App.jsx", "old_str": "x", "new_str": "y"}"#;
        let params: EditorParams = serde_json::from_str(json).expect("parse failed");
        let args: ToolArgs = params.into();
        assert_eq!(args.command.as_deref(), Some("str_replace"));
        assert_eq!(args.old_str.as_deref(), Some("x"));
        assert_eq!(args.new_str.as_deref(), Some("y"));
        assert!(args.new_path.is_none());
    }

    #[test]
    fn test_manager_params_into_args() {
        let json = r#"{"command": "rename", "path": "/App.jsx", "new_path": "/Main.jsx"}"#;
        let params: ManagerParams = serde_json::from_str(json).expect("parse failed");
        let args: ToolArgs = params.into();
        assert_eq!(args.command.as_deref(), Some("rename"));
        assert_eq!(args.new_path.as_deref(), Some("/Main.jsx"));
    }

    #[tokio::test]
    async fn test_apply_reports_success_and_failure() {
        let server = AtelierServer::new();

        let create: EditorParams = serde_json::from_str(
            r#"{"command": "create", "path": "/App.jsx", "file_text": "x"}"#,
        )
        .expect("parse failed");
        let result = server
            .apply("str_replace_editor", create.into())
            .await
            .expect("apply");
        assert_ne!(result.is_error, Some(true));

        let view_missing: EditorParams =
            serde_json::from_str(r#"{"command": "view", "path": "/nope.jsx"}"#).expect("parse");
        let result = server
            .apply("str_replace_editor", view_missing.into())
            .await
            .expect("apply");
        assert_eq!(result.is_error, Some(true));
    }
}
