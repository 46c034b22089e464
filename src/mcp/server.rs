//! HTTP server implementation
//!
//! Exposes tool listing, tool execution and direct document creation as a
//! JSON API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{DocsToolsError, Result, ToolError};
use crate::google::types::CreateDocResult;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::{DocRequest, ErrorBody, HealthStatus, Tool, ToolRequest};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    tools: Arc<ToolHandler>,
}

/// Error returned from a handler, rendered as `{"detail": ...}`
pub enum ApiError {
    /// The operation itself failed
    Service(DocsToolsError),

    /// The request body could not be read as the expected JSON
    Body(JsonRejection),
}

impl From<DocsToolsError> for ApiError {
    fn from(err: DocsToolsError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(DocsToolsError::Tool(ToolError::UnknownTool { .. })) => {
                StatusCode::NOT_FOUND
            }
            Self::Service(DocsToolsError::Tool(ToolError::InvalidArguments { .. })) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Body(rejection) => rejection.status(),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Service(DocsToolsError::Tool(err)) => err.to_string(),
            Self::Service(err) => err.to_string(),
            Self::Body(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            tracing::error!(error = %detail, "Request failed");
        } else {
            tracing::warn!(error = %detail, "Request rejected");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Build the API router
pub fn router(tools: Arc<ToolHandler>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/tools", get(list_tools))
        .route("/api/tools", get(list_tools))
        .route("/execute", post(execute_tool))
        .route("/create_doc", post(create_doc))
        .with_state(AppState { tools })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until the process is stopped
pub async fn serve(config: &Config, tools: Arc<ToolHandler>) -> Result<()> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {} (CORS open to all origins)", addr);
    tracing::info!("  -> Tools:   GET /tools, GET /api/tools");
    tracing::info!("  -> Execute: POST /execute");
    tracing::info!("  -> Create:  POST /create_doc");
    tracing::info!("  -> Health:  GET /health");

    axum::serve(listener, router(tools)).await?;
    Ok(())
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<Tool>> {
    Json(state.tools.list_tools())
}

async fn execute_tool(
    State(state): State<AppState>,
    request: std::result::Result<Json<ToolRequest>, JsonRejection>,
) -> std::result::Result<Json<Value>, ApiError> {
    let Json(request) = request?;
    Ok(Json(state.tools.execute(request).await?))
}

async fn create_doc(
    State(state): State<AppState>,
    request: std::result::Result<Json<DocRequest>, JsonRejection>,
) -> std::result::Result<Json<CreateDocResult>, ApiError> {
    let Json(request) = request?;
    let result = state
        .tools
        .create_doc(&request.title, request.content())
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_maps_to_not_found() {
        let err = ApiError::from(DocsToolsError::Tool(ToolError::UnknownTool {
            name: "nope".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "Tool 'nope' not found");
    }

    #[test]
    fn test_remote_failure_maps_to_internal_error() {
        let err = ApiError::from(DocsToolsError::Docs(
            crate::error::DocsApiError::RequestFailed {
                message: "boom".to_string(),
            },
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail().contains("boom"));
    }
}
