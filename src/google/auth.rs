//! OAuth authentication for the Google Docs API
//!
//! Handles the credential lifecycle:
//! - Loading and persisting tokens in the credential store
//! - Refreshing expired access tokens
//! - Interactive browser-based authorization with a loopback redirect

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Mutex};
use yup_oauth2::ApplicationSecret;

use crate::config::Config;
use crate::error::{AuthError, DocsToolsError, Result};

/// Tokens are treated as expired this many seconds before their real expiry
const EXPIRY_SKEW_SECS: i64 = 300;

/// Stored credentials (tokens)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// Access token
    pub access_token: String,

    /// Refresh token
    pub refresh_token: Option<String>,

    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Expiry timestamp (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,

    /// Granted scopes, space separated
    #[serde(default)]
    pub scope: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl StoredCredentials {
    /// Whether the access token is expired (or about to be) at `now`
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expiry_date {
            Some(expiry) => expiry.saturating_sub(now) < EXPIRY_SKEW_SECS,
            None => false,
        }
    }

    /// Whether the granted scope covers every required scope
    pub fn has_scopes(&self, required: &[String]) -> bool {
        let granted: Vec<&str> = self.scope.split_whitespace().collect();
        required.iter().all(|s| granted.contains(&s.as_str()))
    }

    /// Usable without touching the authorization server
    pub fn is_valid(&self, required: &[String], now: i64) -> bool {
        !self.is_expired(now) && self.has_scopes(required)
    }
}

/// Current Unix time in seconds
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

// ==================== Credential Store ====================

/// File-backed store holding the single persisted credential
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted credential; a missing file is not an error
    pub async fn load(&self) -> Result<Option<StoredCredentials>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(creds) => Ok(Some(creds)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable credential file"
                );
                Ok(None)
            }
        }
    }

    /// Save credentials to file
    pub async fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let content = serde_json::to_string_pretty(credentials)?;
        tokio::fs::write(&self.path, content).await?;
        tracing::debug!(path = %self.path.display(), "Credentials persisted");
        Ok(())
    }
}

// ==================== Authorization Server ====================

/// The OAuth authorization server as seen by the credential manager
#[async_trait]
pub trait AuthorizationServer: Send + Sync {
    /// Exchange the refresh token of `credentials` for a fresh access token
    async fn refresh(&self, credentials: &StoredCredentials) -> Result<StoredCredentials>;

    /// Run the full interactive authorization grant for `scopes`
    async fn authorize(&self, scopes: &[String]) -> Result<StoredCredentials>;
}

/// Token response from OAuth token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn into_credentials(
        self,
        previous_refresh_token: Option<String>,
        fallback_scope: String,
        now: i64,
    ) -> StoredCredentials {
        StoredCredentials {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh_token),
            token_type: self.token_type,
            expiry_date: self.expires_in.map(|e| now.saturating_add(e)),
            scope: self.scope.filter(|s| !s.is_empty()).unwrap_or(fallback_scope),
        }
    }
}

/// Google's OAuth 2.0 endpoints driven with installed-app client secrets
pub struct GoogleAuthorizationServer {
    /// HTTP client
    http_client: reqwest::Client,

    /// Path to the operator-supplied client secrets
    secrets_path: PathBuf,

    /// Loopback port for the redirect; 0 picks any free port
    callback_port: u16,
}

impl GoogleAuthorizationServer {
    /// Create an authorization server client from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            secrets_path: config.secrets_path.clone(),
            callback_port: config.oauth_callback_port,
        }
    }

    /// Load OAuth client secrets ("installed" or "web" format)
    async fn load_secret(&self) -> Result<ApplicationSecret> {
        yup_oauth2::read_application_secret(&self.secrets_path)
            .await
            .map_err(|e| {
                let err = if e.kind() == std::io::ErrorKind::NotFound {
                    AuthError::SecretsFileNotFound {
                        path: self.secrets_path.display().to_string(),
                    }
                } else {
                    AuthError::InvalidSecrets {
                        message: e.to_string(),
                    }
                };
                DocsToolsError::Auth(err)
            })
    }

    /// POST a form to the token endpoint
    async fn request_token(
        &self,
        secret: &ApplicationSecret,
        params: &[(&str, &str)],
    ) -> std::result::Result<TokenResponse, String> {
        let response = self
            .http_client
            .post(&secret.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("{}: {}", status, text));
        }

        response.json().await.map_err(|e| e.to_string())
    }

    /// Exchange authorization code for tokens
    pub async fn exchange_code(
        &self,
        secret: &ApplicationSecret,
        code: &str,
        redirect_uri: &str,
        scopes: &[String],
    ) -> Result<StoredCredentials> {
        let params = [
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];

        let token_response = self
            .request_token(secret, &params)
            .await
            .map_err(|message| AuthError::TokenExchangeFailed { message })?;

        Ok(token_response.into_credentials(None, scopes.join(" "), unix_now()))
    }
}

/// Generate the authorization URL for the consent screen
pub fn generate_auth_url(secret: &ApplicationSecret, redirect_uri: &str, scopes: &[String]) -> String {
    let scopes = scopes.join(" ");
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
        secret.auth_uri,
        urlencoding::encode(&secret.client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&scopes)
    )
}

/// Outcome delivered by the loopback callback
type CallbackOutcome = std::result::Result<String, AuthError>;

fn callback_outcome(params: &HashMap<String, String>) -> CallbackOutcome {
    if let Some(code) = params.get("code") {
        Ok(code.clone())
    } else if let Some(error) = params.get("error") {
        Err(AuthError::AuthorizationDenied {
            message: error.clone(),
        })
    } else {
        Err(AuthError::NoAuthCode)
    }
}

#[async_trait]
impl AuthorizationServer for GoogleAuthorizationServer {
    async fn refresh(&self, credentials: &StoredCredentials) -> Result<StoredCredentials> {
        let refresh_token = credentials.refresh_token.clone().ok_or_else(|| {
            DocsToolsError::Auth(AuthError::TokenRefreshFailed {
                message: "No refresh token available".to_string(),
            })
        })?;

        let secret = self.load_secret().await?;
        let params = [
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let token_response = self
            .request_token(&secret, &params)
            .await
            .map_err(|message| AuthError::TokenRefreshFailed { message })?;

        Ok(token_response.into_credentials(
            Some(refresh_token),
            credentials.scope.clone(),
            unix_now(),
        ))
    }

    async fn authorize(&self, scopes: &[String]) -> Result<StoredCredentials> {
        use axum::{extract::Query, response::Html, routing::get, Router};

        let secret = self.load_secret().await?;

        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], self.callback_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://localhost:{}/", port);

        let auth_url = generate_auth_url(&secret, &redirect_uri, scopes);
        eprintln!("\nPlease visit this URL to authorize this application:");
        eprintln!("{}\n", auth_url);

        if let Err(e) = open::that(&auth_url) {
            tracing::warn!(error = %e, "Could not open browser automatically; open the URL manually");
        }

        let (tx, rx) = oneshot::channel::<CallbackOutcome>();
        let tx = Arc::new(Mutex::new(Some(tx)));

        let callback_handler = move |Query(params): Query<HashMap<String, String>>| async move {
            let outcome = callback_outcome(&params);
            let page = if outcome.is_ok() {
                Html("<html><body><h1>Authorization successful!</h1><p>You can close this window.</p></body></html>")
            } else {
                Html("<html><body><h1>Authorization failed</h1><p>No authorization code received.</p></body></html>")
            };
            if let Some(tx) = tx.lock().await.take() {
                let _ = tx.send(outcome);
            }
            page
        };

        let app = Router::new().route("/", get(callback_handler));

        tracing::info!(port, "Waiting for authorization callback");

        let server = axum::serve(listener, app);

        let code = tokio::select! {
            result = server => {
                let message = match result {
                    Ok(()) => "callback server stopped".to_string(),
                    Err(e) => e.to_string(),
                };
                return Err(AuthError::CallbackError { message }.into());
            }
            outcome = rx => match outcome {
                Ok(outcome) => outcome?,
                Err(_) => return Err(AuthError::NoAuthCode.into()),
            },
        };

        tracing::debug!("Received authorization code, exchanging for tokens");
        self.exchange_code(&secret, &code, &redirect_uri, scopes).await
    }
}

// ==================== Credential Manager ====================

/// Ensures a valid credential exists, refreshing or re-authorizing as needed
pub struct CredentialManager {
    store: CredentialStore,
    auth_server: Arc<dyn AuthorizationServer>,
    scopes: Vec<String>,

    /// Serializes the load/refresh/persist cycle within this process
    lock: Mutex<()>,
}

impl CredentialManager {
    /// Create a credential manager from configuration
    pub fn new(config: &Config, auth_server: Arc<dyn AuthorizationServer>) -> Self {
        Self {
            store: CredentialStore::new(config.token_path.clone()),
            auth_server,
            scopes: config.scopes.clone(),
            lock: Mutex::new(()),
        }
    }

    /// Credential store backing this manager
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Return a credential that is valid right now
    pub async fn obtain_credential(&self) -> Result<StoredCredentials> {
        let _guard = self.lock.lock().await;

        let stored = self.store.load().await?;
        let now = unix_now();

        let credentials = match stored {
            Some(creds) if creds.is_valid(&self.scopes, now) => {
                tracing::debug!("Using stored credentials");
                return Ok(creds);
            }
            Some(creds) if creds.refresh_token.is_some() && creds.has_scopes(&self.scopes) => {
                tracing::info!("Access token expired, refreshing");
                self.auth_server.refresh(&creds).await?
            }
            _ => {
                tracing::info!("No usable credentials, starting interactive authorization");
                self.auth_server.authorize(&self.scopes).await?
            }
        };

        self.store.save(&credentials).await?;
        Ok(credentials)
    }

    /// Get a valid access token
    pub async fn access_token(&self) -> Result<String> {
        Ok(self.obtain_credential().await?.access_token)
    }
}
