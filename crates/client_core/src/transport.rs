//! reqwest-backed implementation of [`QaBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::DocumentRef,
    error::BackendErrorBody,
    protocol::{PdfListResponse, QueryHttpRequest, QueryHttpResponse, UploadHttpResponse},
};
use tracing::debug;
use url::Url;

use crate::{
    error::ClientError,
    types::{DocumentUpload, QueryAnswer, QueryRequest},
    QaBackend,
};

pub const QUERY_ENDPOINT: &str = "/query";
pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const PDFS_ENDPOINT: &str = "/pdfs";

const UPLOAD_FIELD: &str = "file";
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct HttpQaClient {
    http: Client,
    base_url: Url,
}

impl HttpQaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, None)
    }

    /// `None` leaves requests without a deadline.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, endpoint: &'static str) -> Result<Url, ClientError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, endpoint.trim_start_matches('/')),
                source,
            })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| ClientError::Network { endpoint, source })?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<BackendErrorBody>(&body)
            .ok()
            .and_then(|body| body.detail_text());
        return Err(ClientError::Status {
            endpoint,
            status,
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|err| ClientError::Decode {
        endpoint,
        reason: err.to_string(),
    })
}

#[async_trait]
impl QaBackend for HttpQaClient {
    async fn fetch_documents(&self) -> Result<Vec<DocumentRef>, ClientError> {
        let url = self.endpoint(PDFS_ENDPOINT)?;
        debug!(%url, "listing documents");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: PDFS_ENDPOINT,
                source,
            })?;
        let listing: PdfListResponse = read_json(PDFS_ENDPOINT, response).await?;
        Ok(listing.pdfs.into_iter().map(DocumentRef::from).collect())
    }

    async fn upload(&self, upload: DocumentUpload) -> Result<String, ClientError> {
        let url = self.endpoint(UPLOAD_ENDPOINT)?;
        debug!(%url, file_name = %upload.file_name, size = upload.bytes.len(), "uploading document");
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(PDF_MIME)
            .map_err(ClientError::Build)?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: UPLOAD_ENDPOINT,
                source,
            })?;
        let body: UploadHttpResponse = read_json(UPLOAD_ENDPOINT, response).await?;
        Ok(body.message)
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryAnswer, ClientError> {
        let url = self.endpoint(QUERY_ENDPOINT)?;
        debug!(%url, document = %request.document, "querying backend");
        let payload = QueryHttpRequest {
            question: request.question.clone(),
            keyword: request.keyword.clone(),
            file_name: request.document.clone(),
            cached: false,
        };
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: QUERY_ENDPOINT,
                source,
            })?;
        let body: QueryHttpResponse = read_json(QUERY_ENDPOINT, response).await?;
        Ok(QueryAnswer {
            cached: body.was_cached(),
            answer: body.answer,
        })
    }
}
