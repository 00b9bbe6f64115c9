use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems detected locally before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a question.")]
    EmptyQuestion,
    #[error("Please select a PDF.")]
    NoDocumentSelected,
    #[error("Please select a file to upload.")]
    NoFileSelected,
    #[error("Unknown PDF '{0}'.")]
    UnknownDocument(String),
    #[error("Could not read '{path}': {reason}")]
    UnreadableFile { path: String, reason: String },
}

/// Error body returned by the backend on non-2xx responses (`{"detail": ...}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl BackendErrorBody {
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
