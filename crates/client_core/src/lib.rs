use async_trait::async_trait;
use shared::domain::{DocumentName, DocumentRef};
use tracing::{info, warn};

pub mod error;
pub mod transport;
pub mod types;

pub use error::{ClientError, ClientErrorKind};
pub use transport::HttpQaClient;
pub use types::{
    DocumentListing, DocumentUpload, QueryAnswer, QueryOutcome, QueryRequest, UploadOutcome,
    QUERY_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE,
};

/// The three remote operations exposed by the question-answering backend.
#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn fetch_documents(&self) -> Result<Vec<DocumentRef>, ClientError>;
    async fn upload(&self, upload: DocumentUpload) -> Result<String, ClientError>;
    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, ClientError>;
}

/// Soft-failure front for a [`QaBackend`]: every call returns a displayable
/// value and the error kind, never an error.
pub struct QaClient<B> {
    backend: B,
}

impl<B: QaBackend> QaClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn list_documents(&self) -> Vec<DocumentRef> {
        self.fetch_listing().await.documents
    }

    pub async fn fetch_listing(&self) -> DocumentListing {
        match self.backend.fetch_documents().await {
            Ok(documents) => {
                info!(count = documents.len(), "fetched document list");
                DocumentListing {
                    documents,
                    failure: None,
                }
            }
            Err(err) => {
                warn!(kind = err.kind().as_str(), error = %err, "document list unavailable");
                DocumentListing {
                    documents: Vec::new(),
                    failure: Some(err.kind()),
                }
            }
        }
    }

    pub async fn upload_document(&self, upload: DocumentUpload) -> UploadOutcome {
        let file_name = upload.file_name.clone();
        match self.backend.upload(upload).await {
            Ok(message) => {
                info!(%file_name, "uploaded document");
                UploadOutcome {
                    message,
                    failure: None,
                }
            }
            Err(err) => {
                warn!(
                    %file_name,
                    kind = err.kind().as_str(),
                    detail = err.detail().unwrap_or_default(),
                    error = %err,
                    "document upload failed"
                );
                UploadOutcome {
                    message: UPLOAD_FAILED_MESSAGE.to_string(),
                    failure: Some(err.kind()),
                }
            }
        }
    }

    pub async fn ask_question(
        &self,
        question: &str,
        keyword: Option<&str>,
        document: &DocumentName,
    ) -> QueryOutcome {
        self.ask(&QueryRequest::new(question, keyword, document.clone()))
            .await
    }

    pub async fn ask(&self, request: &QueryRequest) -> QueryOutcome {
        match self.backend.query(request).await {
            Ok(answer) => {
                info!(document = %request.document, cached = answer.cached, "received answer");
                QueryOutcome {
                    answer_text: answer.answer,
                    was_cached: answer.cached,
                    failure: None,
                }
            }
            Err(err) => {
                warn!(
                    document = %request.document,
                    kind = err.kind().as_str(),
                    detail = err.detail().unwrap_or_default(),
                    error = %err,
                    "query failed"
                );
                QueryOutcome {
                    answer_text: QUERY_FAILED_MESSAGE.to_string(),
                    was_cached: false,
                    failure: Some(err.kind()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
