use serde::{Deserialize, Serialize};

use crate::domain::{DocumentName, DocumentRef};

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHttpRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub file_name: DocumentName,
    #[serde(default)]
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryHttpResponse {
    pub answer: String,
    /// Absent and `null` both mean "not cached".
    #[serde(default)]
    pub cached: Option<bool>,
}

impl QueryHttpResponse {
    pub fn was_cached(&self) -> bool {
        self.cached.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadHttpResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfEntry {
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
}

/// Body of `GET /pdfs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfListResponse {
    pub pdfs: Vec<PdfEntry>,
}

impl From<PdfEntry> for DocumentRef {
    fn from(entry: PdfEntry) -> Self {
        DocumentRef::new(entry.file_name, entry.file_path)
    }
}
