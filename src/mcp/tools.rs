//! Tool definitions and dispatch
//!
//! Defines all available tools and routes a tool request to its implementation.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{Result, ToolError};
use crate::google::docs::DocsClient;
use crate::google::types::CreateDocResult;
use crate::mcp::types::{Tool, ToolRequest};

/// Name of the document creation tool
pub const CREATE_DOC: &str = "create_doc";

/// Title used when the caller does not supply one
pub const DEFAULT_TITLE: &str = "Untitled";

/// Arguments of the `create_doc` tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDocArgs {
    pub title: String,
    pub content: String,
}

impl Default for CreateDocArgs {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
        }
    }
}

/// A tool invocation with typed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    CreateDoc(CreateDocArgs),
}

impl ToolCall {
    /// Resolve a tool name and its raw parameters
    pub fn parse(name: &str, parameters: Map<String, Value>) -> std::result::Result<Self, ToolError> {
        match name {
            CREATE_DOC => {
                #[derive(Deserialize)]
                struct Args {
                    #[serde(default)]
                    title: Option<String>,
                    #[serde(default)]
                    content: Option<String>,
                }

                let args: Args = serde_json::from_value(Value::Object(parameters)).map_err(|e| {
                    ToolError::InvalidArguments {
                        message: e.to_string(),
                    }
                })?;

                let defaults = CreateDocArgs::default();
                Ok(ToolCall::CreateDoc(CreateDocArgs {
                    title: args.title.unwrap_or(defaults.title),
                    content: args.content.unwrap_or(defaults.content),
                }))
            }
            _ => Err(ToolError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }
}

/// Tool handler
pub struct ToolHandler {
    docs_client: Arc<DocsClient>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(docs_client: Arc<DocsClient>) -> Self {
        Self { docs_client }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![tool_def(
            CREATE_DOC,
            "Creates a new Google Doc with an optional body text",
            create_doc_schema(),
        )]
    }

    /// Run a tool request
    pub async fn execute(&self, request: ToolRequest) -> Result<Value> {
        let call = ToolCall::parse(&request.tool, request.parameters)?;
        tracing::debug!(tool = %request.tool, "Executing tool");

        match call {
            ToolCall::CreateDoc(args) => {
                let result = self.create_doc(&args.title, &args.content).await?;
                Ok(serde_json::to_value(result)?)
            }
        }
    }

    /// Create a document directly, bypassing name dispatch
    pub async fn create_doc(&self, title: &str, content: &str) -> Result<CreateDocResult> {
        self.docs_client.create_document(title, content).await
    }
}

// ==================== Helper Functions ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn create_doc_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Document title",
                "default": DEFAULT_TITLE
            },
            "content": {
                "type": "string",
                "description": "Text to place in the document body",
                "default": ""
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let call = ToolCall::parse(CREATE_DOC, Map::new()).unwrap();
        assert_eq!(
            call,
            ToolCall::CreateDoc(CreateDocArgs {
                title: "Untitled".to_string(),
                content: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_with_arguments() {
        let call = ToolCall::parse(
            CREATE_DOC,
            params(json!({"title": "Plan", "content": "Step one", "extra": 1})),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::CreateDoc(CreateDocArgs {
                title: "Plan".to_string(),
                content: "Step one".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolCall::parse("send_email", Map::new()).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { ref name } if name == "send_email"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let err = ToolCall::parse(CREATE_DOC, params(json!({"title": 42}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_schema_lists_both_fields() {
        let schema = create_doc_schema();
        assert!(schema["properties"]["title"].is_object());
        assert!(schema["properties"]["content"].is_object());
    }
}
