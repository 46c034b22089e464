//! Tool protocol type definitions
//!
//! Request and response bodies of the tools HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool definition as listed by `GET /tools`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Tool name
    pub name: String,

    /// Tool description
    pub description: String,

    /// JSON schema for input parameters
    pub input_schema: Value,
}

/// Body of `POST /execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Name of the tool to run
    pub tool: String,

    /// Free-form tool parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Body of `POST /create_doc`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRequest {
    pub title: String,

    #[serde(default)]
    pub content: Option<String>,
}

impl DocRequest {
    /// Body text, empty when omitted
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
