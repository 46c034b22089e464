//! Configuration management for the Google Docs tools server
//!
//! Handles paths, environment variables, and configuration loading.

use std::path::PathBuf;

use crate::error::{ConfigError, DocsToolsError, Result};

/// Default HTTP port for the tools API
pub const DEFAULT_PORT: u16 = 8888;

/// Default bind address for the tools API
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Configuration for the Google Docs tools server
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to stored credentials (access/refresh tokens)
    pub token_path: PathBuf,

    /// Path to OAuth client secrets (client id/secret), supplied by the operator
    pub secrets_path: PathBuf,

    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Loopback port for the OAuth redirect; 0 picks any free port
    pub oauth_callback_port: u16,

    /// Google API scopes requested during authorization
    pub scopes: Vec<String>,
}

impl Config {
    /// Create a new configuration from the environment
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a configuration, resolving overrides through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_path = lookup("GDOCS_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("token.json"));

        let secrets_path = lookup("GDOCS_SECRETS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("credentials.json"));

        let host = lookup("GDOCS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("GDOCS_PORT") {
            Some(p) => parse_port("GDOCS_PORT", &p)?,
            None => DEFAULT_PORT,
        };

        let oauth_callback_port = match lookup("GDOCS_OAUTH_PORT") {
            Some(p) => parse_port("GDOCS_OAUTH_PORT", &p)?,
            None => 0,
        };

        Ok(Self {
            token_path,
            secrets_path,
            host,
            port,
            oauth_callback_port,
            scopes: vec![google::DRIVE_FILE_SCOPE.to_string()],
        })
    }

    /// Address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if OAuth client secrets exist
    pub fn secrets_exist(&self) -> bool {
        self.secrets_path.exists()
    }
}

fn parse_port(var: &str, value: &str) -> Result<u16> {
    value.trim().parse().map_err(|_| {
        DocsToolsError::Config(ConfigError::InvalidConfig {
            message: format!("{} must be a port number, got '{}'", var, value),
        })
    })
}

/// Google API constants
pub mod google {
    /// Base URL for the Google Docs API
    pub const DOCS_API_BASE_URL: &str = "https://docs.googleapis.com/v1";

    /// Per-file Drive access: only documents this app creates or opens
    pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

    /// Index just past the implicit leading anchor of a new document body
    pub const DOCUMENT_START_INDEX: i64 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.token_path, PathBuf::from("token.json"));
        assert_eq!(config.secrets_path, PathBuf::from("credentials.json"));
        assert_eq!(config.bind_address(), "0.0.0.0:8888");
        assert_eq!(config.oauth_callback_port, 0);
    }

    #[test]
    fn test_default_scopes() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.scopes.len(), 1);
        assert!(config.scopes[0].ends_with("drive.file"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GDOCS_TOKEN_PATH", "/tmp/tok.json"),
            ("GDOCS_PORT", "9000"),
            ("GDOCS_OAUTH_PORT", "8765"),
        ]))
        .unwrap();
        assert_eq!(config.token_path, PathBuf::from("/tmp/tok.json"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.oauth_callback_port, 8765);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("GDOCS_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, DocsToolsError::Config(_)));
        assert!(err.to_string().contains("GDOCS_PORT"));
    }
}
