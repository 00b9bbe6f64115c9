use super::*;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedPart {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct BackendState {
    queries: Arc<Mutex<Vec<Value>>>,
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
}

struct DecodeFailingBackend;

#[async_trait]
impl QaBackend for DecodeFailingBackend {
    async fn fetch_documents(&self) -> Result<Vec<DocumentRef>, ClientError> {
        Err(ClientError::Decode {
            endpoint: transport::PDFS_ENDPOINT,
            reason: "expected an array".into(),
        })
    }

    async fn upload(&self, _upload: DocumentUpload) -> Result<String, ClientError> {
        Err(ClientError::Decode {
            endpoint: transport::UPLOAD_ENDPOINT,
            reason: "missing field `message`".into(),
        })
    }

    async fn query(&self, _request: &QueryRequest) -> Result<QueryAnswer, ClientError> {
        Err(ClientError::Decode {
            endpoint: transport::QUERY_ENDPOINT,
            reason: "missing field `answer`".into(),
        })
    }
}

async fn handle_query(
    State(state): State<BackendState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    state.queries.lock().await.push(payload);
    Json(json!({ "answer": "X is Y", "cached": true }))
}

async fn handle_upload(
    State(state): State<BackendState>,
    mut multipart: Multipart,
) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let part = ReceivedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: Vec::new(),
        };
        let bytes = field.bytes().await.expect("field bytes");
        state.parts.lock().await.push(ReceivedPart {
            bytes: bytes.to_vec(),
            ..part
        });
    }
    Json(json!({ "message": "File uploaded successfully" }))
}

async fn spawn_backend(app: Router) -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn spawn_recording_backend() -> anyhow::Result<(String, BackendState)> {
    let state = BackendState::default();
    let app = Router::new()
        .route("/query", post(handle_query))
        .route("/upload", post(handle_upload))
        .with_state(state.clone());
    Ok((spawn_backend(app).await?, state))
}

async fn spawn_pdfs_backend(status: StatusCode, body: Value) -> anyhow::Result<String> {
    let app = Router::new().route(
        "/pdfs",
        get(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    spawn_backend(app).await
}

async fn unreachable_backend_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn http_client(base_url: &str) -> QaClient<HttpQaClient> {
    QaClient::new(HttpQaClient::new(base_url).expect("client"))
}

#[tokio::test]
async fn list_documents_maps_listing_entries() {
    let url = spawn_pdfs_backend(
        StatusCode::OK,
        json!({ "pdfs": [{ "file_name": "a.pdf", "file_path": "/a.pdf" }] }),
    )
    .await
    .expect("spawn backend");

    let documents = http_client(&url).list_documents().await;
    assert_eq!(documents, vec![DocumentRef::new("a.pdf", "/a.pdf")]);
}

#[tokio::test]
async fn list_documents_keeps_entries_missing_a_path() {
    let url = spawn_pdfs_backend(
        StatusCode::OK,
        json!({ "pdfs": [
            { "file_name": "a.pdf" },
            { "file_name": "b.pdf", "file_path": "/b.pdf" }
        ] }),
    )
    .await
    .expect("spawn backend");

    let listing = http_client(&url).fetch_listing().await;
    assert_eq!(
        listing.documents,
        vec![DocumentRef::new("a.pdf", ""), DocumentRef::new("b.pdf", "/b.pdf")]
    );
    assert_eq!(listing.failure, None);
}

#[tokio::test]
async fn list_documents_treats_non_array_listing_as_empty() {
    let url = spawn_pdfs_backend(StatusCode::OK, json!({ "pdfs": "not-an-array" }))
        .await
        .expect("spawn backend");
    let client = http_client(&url);

    assert!(client.list_documents().await.is_empty());
    let listing = client.fetch_listing().await;
    assert!(listing.documents.is_empty());
    assert_eq!(listing.failure, Some(ClientErrorKind::Decode));
}

#[tokio::test]
async fn list_documents_soft_fails_on_server_error() {
    let url = spawn_pdfs_backend(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "disk unavailable" }),
    )
    .await
    .expect("spawn backend");
    let client = http_client(&url);

    let listing = client.fetch_listing().await;
    assert!(listing.documents.is_empty());
    assert_eq!(listing.failure, Some(ClientErrorKind::Status));

    let err = client
        .backend()
        .fetch_documents()
        .await
        .expect_err("must fail");
    assert_eq!(err.detail(), Some("disk unavailable"));
}

#[tokio::test]
async fn list_documents_soft_fails_when_backend_unreachable() {
    let client = http_client(&unreachable_backend_url().await);

    let listing = client.fetch_listing().await;
    assert!(listing.documents.is_empty());
    assert_eq!(listing.failure, Some(ClientErrorKind::Network));
}

#[tokio::test]
async fn upload_document_sends_single_file_part() {
    let (url, state) = spawn_recording_backend().await.expect("spawn backend");

    let outcome = http_client(&url)
        .upload_document(DocumentUpload::new("report.pdf", b"%PDF-1.4 test".to_vec()))
        .await;

    assert_eq!(outcome.message, "File uploaded successfully");
    assert_eq!(outcome.failure, None);
    let parts = state.parts.lock().await;
    assert_eq!(
        *parts,
        vec![ReceivedPart {
            field: "file".into(),
            file_name: Some("report.pdf".into()),
            content_type: Some("application/pdf".into()),
            bytes: b"%PDF-1.4 test".to_vec(),
        }]
    );
}

#[tokio::test]
async fn upload_document_transport_failure_returns_fixed_message() {
    let client = http_client(&unreachable_backend_url().await);

    let outcome = client
        .upload_document(DocumentUpload::new("report.pdf", vec![1, 2, 3]))
        .await;

    assert_eq!(outcome.message, UPLOAD_FAILED_MESSAGE);
    assert_eq!(outcome.failure, Some(ClientErrorKind::Network));
}

#[tokio::test]
async fn ask_question_sends_question_keyword_and_document() {
    let (url, state) = spawn_recording_backend().await.expect("spawn backend");

    let outcome = http_client(&url)
        .ask_question("What is X?", Some("X"), &DocumentName::from("doc1.pdf"))
        .await;

    assert_eq!(
        outcome,
        QueryOutcome {
            answer_text: "X is Y".into(),
            was_cached: true,
            failure: None,
        }
    );
    let queries = state.queries.lock().await;
    assert_eq!(
        *queries,
        vec![json!({
            "question": "What is X?",
            "keyword": "X",
            "file_name": "doc1.pdf",
            "cached": false
        })]
    );
}

#[tokio::test]
async fn ask_question_defaults_cached_flag_when_absent() {
    let app = Router::new().route(
        "/query",
        post(|| async { Json(json!({ "answer": "fresh answer" })) }),
    );
    let url = spawn_backend(app).await.expect("spawn backend");

    let outcome = http_client(&url)
        .ask_question("Why?", None, &DocumentName::from("doc1.pdf"))
        .await;

    assert_eq!(outcome.answer_text, "fresh answer");
    assert!(!outcome.was_cached);
}

#[tokio::test]
async fn ask_question_keeps_answer_when_cached_is_null() {
    let app = Router::new().route(
        "/query",
        post(|| async { Json(json!({ "answer": "real answer", "cached": null })) }),
    );
    let url = spawn_backend(app).await.expect("spawn backend");

    let outcome = http_client(&url)
        .ask_question("Why?", None, &DocumentName::from("doc1.pdf"))
        .await;

    assert_eq!(outcome.answer_text, "real answer");
    assert!(!outcome.was_cached);
    assert_eq!(outcome.failure, None);
}

#[tokio::test]
async fn ask_question_status_error_returns_fixed_message() {
    let app = Router::new().route(
        "/query",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "PDF not found" })),
            )
        }),
    );
    let url = spawn_backend(app).await.expect("spawn backend");
    let client = http_client(&url);

    let outcome = client
        .ask_question("Why?", None, &DocumentName::from("missing.pdf"))
        .await;
    assert_eq!(outcome.answer_text, QUERY_FAILED_MESSAGE);
    assert!(!outcome.was_cached);
    assert_eq!(outcome.failure, Some(ClientErrorKind::Status));

    let err = client
        .backend()
        .query(&QueryRequest::new("Why?", None, DocumentName::from("missing.pdf")))
        .await
        .expect_err("must fail");
    assert_eq!(err.detail(), Some("PDF not found"));
}

#[tokio::test]
async fn soft_failure_layer_preserves_error_kind() {
    let client = QaClient::new(DecodeFailingBackend);

    assert!(client.list_documents().await.is_empty());

    let upload = client
        .upload_document(DocumentUpload::new("a.pdf", Vec::new()))
        .await;
    assert_eq!(upload.message, UPLOAD_FAILED_MESSAGE);
    assert_eq!(upload.failure, Some(ClientErrorKind::Decode));

    let answer = client
        .ask_question("q", None, &DocumentName::from("a.pdf"))
        .await;
    assert_eq!(answer.answer_text, QUERY_FAILED_MESSAGE);
    assert_eq!(answer.failure, Some(ClientErrorKind::Decode));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let app = Router::new().route(
        "/api/pdfs",
        get(|| async {
            Json(json!({ "pdfs": [{ "file_name": "b.pdf", "file_path": "/data/b.pdf" }] }))
        }),
    );
    let url = spawn_backend(app).await.expect("spawn backend");

    let documents = http_client(&format!("{url}/api")).list_documents().await;
    assert_eq!(documents, vec![DocumentRef::new("b.pdf", "/data/b.pdf")]);
}

#[test]
fn rejects_base_url_that_cannot_hold_paths() {
    for raw in ["not a url", "localhost:8000"] {
        let err = HttpQaClient::new(raw).expect_err("must reject");
        assert_eq!(err.kind(), ClientErrorKind::InvalidUrl, "input: {raw}");
    }
}

#[test]
fn blank_keyword_is_dropped_from_request() {
    let request = QueryRequest::new("q", Some("   "), DocumentName::from("a.pdf"));
    assert_eq!(request.keyword, None);

    let request = QueryRequest::new("q", Some(" revenue "), DocumentName::from("a.pdf"));
    assert_eq!(request.keyword.as_deref(), Some("revenue"));
}
