//! Google Docs API client
//!
//! Creates documents and inserts their initial body text.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::google::DOCS_API_BASE_URL;
use crate::error::{DocsApiError, DocsToolsError, Result};
use crate::google::auth::CredentialManager;
use crate::google::types::{
    BatchUpdateDocumentRequest, CreateDocResult, CreateDocumentRequest, Document, CREATED_MESSAGE,
};

/// Remote document operations, authorized by a bearer token
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    /// `documents.create` with the given title
    async fn create(&self, access_token: &str, title: &str) -> Result<Document>;

    /// `documents.batchUpdate` against an existing document
    async fn batch_update(
        &self,
        access_token: &str,
        document_id: &str,
        request: &BatchUpdateDocumentRequest,
    ) -> Result<()>;
}

/// Docs API over HTTPS
pub struct GoogleDocsApi {
    /// HTTP client
    http_client: reqwest::Client,

    /// API root, normally [`DOCS_API_BASE_URL`]
    base_url: String,
}

impl GoogleDocsApi {
    /// Create a client for the public Docs API
    pub fn new() -> Self {
        Self::with_base_url(DOCS_API_BASE_URL)
    }

    /// Create a client against another API root
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn documents_url(&self) -> String {
        format!("{}/documents", self.base_url)
    }
}

impl Default for GoogleDocsApi {
    fn default() -> Self {
        Self::new()
    }
}

async fn request_failed(action: &str, response: reqwest::Response) -> DocsToolsError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    DocsToolsError::Docs(DocsApiError::RequestFailed {
        message: format!("Failed to {} ({}): {}", action, status, text),
    })
}

#[async_trait]
impl DocumentsApi for GoogleDocsApi {
    async fn create(&self, access_token: &str, title: &str) -> Result<Document> {
        let request = CreateDocumentRequest {
            title: title.to_string(),
        };

        let response = self
            .http_client
            .post(self.documents_url())
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(request_failed("create document", response).await)
        }
    }

    async fn batch_update(
        &self,
        access_token: &str,
        document_id: &str,
        request: &BatchUpdateDocumentRequest,
    ) -> Result<()> {
        let url = format!(
            "{}/{}:batchUpdate",
            self.documents_url(),
            urlencoding::encode(document_id)
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(request_failed("update document", response).await)
        }
    }
}

/// High-level document client used by the tools
pub struct DocsClient {
    api: Arc<dyn DocumentsApi>,
    credentials: Arc<CredentialManager>,
}

impl DocsClient {
    /// Create a new document client
    pub fn new(api: Arc<dyn DocumentsApi>, credentials: Arc<CredentialManager>) -> Self {
        Self { api, credentials }
    }

    /// Create a document titled `title`, with `content` as its body if non-empty.
    ///
    /// Nothing is rolled back: if the text insertion fails the empty document
    /// remains in the user's Drive and the whole call reports failure.
    pub async fn create_document(&self, title: &str, content: &str) -> Result<CreateDocResult> {
        let token = self.credentials.access_token().await?;

        let document = self.api.create(&token, title).await?;
        let document_id = document
            .document_id
            .filter(|id| !id.is_empty())
            .ok_or(DocsToolsError::Docs(DocsApiError::MissingDocumentId))?;

        tracing::debug!(%document_id, title, "Document created");

        if !content.is_empty() {
            let request = BatchUpdateDocumentRequest::insert_text_at_start(content);
            self.api.batch_update(&token, &document_id, &request).await?;
            tracing::debug!(%document_id, chars = content.chars().count(), "Inserted document body");
        }

        Ok(CreateDocResult {
            message: CREATED_MESSAGE.to_string(),
            document_id,
            title: title.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::google::auth::{unix_now, AuthorizationServer, StoredCredentials};
    use crate::google::types::Request;
    use std::sync::Mutex;

    struct StaticAuth;

    #[async_trait]
    impl AuthorizationServer for StaticAuth {
        async fn refresh(&self, credentials: &StoredCredentials) -> Result<StoredCredentials> {
            Ok(credentials.clone())
        }

        async fn authorize(&self, scopes: &[String]) -> Result<StoredCredentials> {
            Ok(StoredCredentials {
                access_token: "token-1".to_string(),
                refresh_token: None,
                token_type: "Bearer".to_string(),
                expiry_date: Some(unix_now() + 3600),
                scope: scopes.join(" "),
            })
        }
    }

    #[derive(Default)]
    struct RecordingApi {
        created: Mutex<Vec<(String, String)>>,
        updates: Mutex<Vec<(String, BatchUpdateDocumentRequest)>>,
        fail_update: bool,
    }

    #[async_trait]
    impl DocumentsApi for RecordingApi {
        async fn create(&self, access_token: &str, title: &str) -> Result<Document> {
            self.created
                .lock()
                .unwrap()
                .push((access_token.to_string(), title.to_string()));
            Ok(Document {
                document_id: Some("doc-123".to_string()),
                title: Some(title.to_string()),
                revision_id: None,
            })
        }

        async fn batch_update(
            &self,
            _access_token: &str,
            document_id: &str,
            request: &BatchUpdateDocumentRequest,
        ) -> Result<()> {
            self.updates
                .lock()
                .unwrap()
                .push((document_id.to_string(), request.clone()));
            if self.fail_update {
                return Err(DocsApiError::RequestFailed {
                    message: "403 Forbidden".to_string(),
                }
                .into());
            }
            Ok(())
        }
    }

    fn client(dir: &tempfile::TempDir, api: Arc<RecordingApi>) -> DocsClient {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.token_path = dir.path().join("token.json");
        let credentials = Arc::new(CredentialManager::new(&config, Arc::new(StaticAuth)));
        DocsClient::new(api, credentials)
    }

    #[tokio::test]
    async fn test_empty_content_skips_insert() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(RecordingApi::default());
        let result = client(&dir, api.clone())
            .create_document("Empty", "")
            .await
            .unwrap();

        assert_eq!(result.document_id, "doc-123");
        assert_eq!(result.title, "Empty");
        assert_eq!(result.message, CREATED_MESSAGE);
        assert_eq!(api.created.lock().unwrap().len(), 1);
        assert!(api.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_content_inserted_once_at_start() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(RecordingApi::default());
        client(&dir, api.clone())
            .create_document("Notes", "Hello, world")
            .await
            .unwrap();

        let created = api.created.lock().unwrap();
        assert_eq!(created[0], ("token-1".to_string(), "Notes".to_string()));

        let updates = api.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "doc-123");
        let Request::InsertText(insert) = &updates[0].1.requests[0];
        assert_eq!(insert.location.index, 1);
        assert_eq!(insert.text, "Hello, world");
    }

    #[tokio::test]
    async fn test_insert_failure_fails_whole_call() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(RecordingApi {
            fail_update: true,
            ..Default::default()
        });
        let err = client(&dir, api.clone())
            .create_document("Notes", "body")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("403 Forbidden"));
        assert_eq!(api.created.lock().unwrap().len(), 1);
    }
}
