//! Runtime bridge between UI command queue and backend event intake.

use std::{path::Path, sync::Arc, thread};

use client_core::{DocumentUpload, QaBackend, QaClient};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::error::ValidationError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

const FALLBACK_UPLOAD_NAME: &str = "document.pdf";

/// Starts the backend worker thread. Each command runs as its own task so
/// list, query and upload requests overlap; the worker stops once every
/// command sender is dropped.
pub fn launch<B>(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    client: QaClient<B>,
) -> thread::JoinHandle<()>
where
    B: QaBackend + 'static,
{
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Startup,
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                return;
            }
        };

        let client = Arc::new(client);
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        for cmd in cmd_rx.iter() {
            let client = Arc::clone(&client);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let cmd_name = cmd.name();
                let event = execute(&client, cmd).await;
                deliver(&ui_tx, event, cmd_name).await;
            });
        }

        tracing::debug!("backend command queue closed; stopping worker");
    })
}

async fn execute<B: QaBackend>(client: &QaClient<B>, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::ListDocuments { seq } => UiEvent::DocumentsLoaded {
            seq,
            listing: client.fetch_listing().await,
        },
        BackendCommand::AskQuestion { seq, request } => UiEvent::AnswerReady {
            seq,
            outcome: client.ask(&request).await,
        },
        BackendCommand::UploadDocument { seq, path } => match read_upload(&path).await {
            Ok(upload) => UiEvent::UploadFinished {
                seq,
                outcome: client.upload_document(upload).await,
            },
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "upload file unreadable");
                UiEvent::UploadRejected { seq, error }
            }
        },
    }
}

/// Hands a completion to the UI thread. A full UI queue is waited out on the
/// blocking pool so runtime workers keep serving other requests.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent, command: &'static str) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(command, "ui event receiver dropped");
            return;
        }
        Err(TrySendError::Full(event)) => event,
    };

    tracing::debug!(command, "ui event queue full; waiting for room");
    let ui_tx = ui_tx.clone();
    let delivered = tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
    if !matches!(delivered, Ok(true)) {
        tracing::debug!(command, "ui event receiver dropped");
    }
}

async fn read_upload(path: &Path) -> Result<DocumentUpload, ValidationError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ValidationError::UnreadableFile {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_UPLOAD_NAME.to_string());
    Ok(DocumentUpload::new(file_name, bytes))
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
