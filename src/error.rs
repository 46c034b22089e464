//! Error types for the Google Docs tools server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Google Docs tools server
#[derive(Error, Debug)]
pub enum DocsToolsError {
    /// OAuth authentication errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Google Docs API errors
    #[error("Docs API error: {0}")]
    Docs(#[from] DocsApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tool dispatch errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// OAuth authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Client secrets file not found: {path}")]
    SecretsFileNotFound { path: String },

    #[error("Invalid client secrets: {message}")]
    InvalidSecrets { message: String },

    #[error("Failed to refresh access token: {message}")]
    TokenRefreshFailed { message: String },

    #[error("Token exchange failed: {message}")]
    TokenExchangeFailed { message: String },

    #[error("OAuth callback error: {message}")]
    CallbackError { message: String },

    #[error("No authorization code provided")]
    NoAuthCode,

    #[error("Authorization denied: {message}")]
    AuthorizationDenied { message: String },
}

/// Google Docs API errors
#[derive(Error, Debug)]
pub enum DocsApiError {
    #[error("API request failed: {message}")]
    RequestFailed { message: String },

    #[error("API response did not include a document ID")]
    MissingDocumentId,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Tool dispatch errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool '{name}' not found")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },
}

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, DocsToolsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::SecretsFileNotFound {
            path: "/path/to/credentials.json".to_string(),
        };
        assert!(err.to_string().contains("/path/to/credentials.json"));
    }

    #[test]
    fn test_error_conversion() {
        let auth_err = AuthError::NoAuthCode;
        let err: DocsToolsError = auth_err.into();
        assert!(matches!(err, DocsToolsError::Auth(_)));
    }

    #[test]
    fn test_unknown_tool_names_the_tool() {
        let err = ToolError::UnknownTool {
            name: "delete_everything".to_string(),
        };
        assert_eq!(err.to_string(), "Tool 'delete_everything' not found");
    }
}
