//! Google Docs API type definitions
//!
//! These types mirror the Docs API request and response bodies used for
//! creating a document and inserting its initial text.

use serde::{Deserialize, Serialize};

use crate::config::google::DOCUMENT_START_INDEX;

/// Message returned when a document has been created
pub const CREATED_MESSAGE: &str = "Document created successfully";

/// Body of `documents.create`
#[derive(Debug, Clone, Serialize)]
pub struct CreateDocumentRequest {
    /// Title of the new document
    pub title: String,
}

/// A Google Docs document (only the fields this server reads)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Revision ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
}

/// Body of `documents.batchUpdate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchUpdateDocumentRequest {
    pub requests: Vec<Request>,
}

impl BatchUpdateDocumentRequest {
    /// A single insertion of `text` at the start of the document body
    pub fn insert_text_at_start(text: impl Into<String>) -> Self {
        Self {
            requests: vec![Request::InsertText(InsertTextRequest {
                location: Location {
                    index: DOCUMENT_START_INDEX,
                },
                text: text.into(),
            })],
        }
    }
}

/// One update inside a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertTextRequest),
}

/// Insert text at a location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertTextRequest {
    pub location: Location,
    pub text: String,
}

/// A position in the document body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub index: i64,
}

/// Result of creating a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDocResult {
    pub message: String,
    pub document_id: String,
    pub title: String,
}
