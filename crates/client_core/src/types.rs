use shared::domain::{DocumentName, DocumentRef};

use crate::error::ClientErrorKind;

pub const QUERY_FAILED_MESSAGE: &str =
    "An error occurred while querying the API. Please try again.";
pub const UPLOAD_FAILED_MESSAGE: &str =
    "An error occurred while uploading the PDF. Please try again.";

/// A single file handed to `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
    pub keyword: Option<String>,
    pub document: DocumentName,
}

impl QueryRequest {
    /// Blank keywords are treated as absent.
    pub fn new(question: impl Into<String>, keyword: Option<&str>, document: DocumentName) -> Self {
        let keyword = keyword
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string);
        Self {
            question: question.into(),
            keyword,
            document,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answer: String,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub answer_text: String,
    pub was_cached: bool,
    pub failure: Option<ClientErrorKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub message: String,
    pub failure: Option<ClientErrorKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentListing {
    pub documents: Vec<DocumentRef>,
    pub failure: Option<ClientErrorKind>,
}
