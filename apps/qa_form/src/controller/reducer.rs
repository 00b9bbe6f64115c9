//! Form state and its three independent request state machines.
//!
//! Every request issued to the backend carries a [`RequestSeq`]. A machine
//! only accepts the completion whose sequence matches the request it is
//! currently waiting on, so late responses from superseded requests are
//! dropped instead of overwriting newer results.

use std::{fmt, mem, path::PathBuf};

use client_core::{ClientErrorKind, QueryRequest};
use shared::{
    domain::{DocumentName, DocumentRef},
    error::ValidationError,
};
use tracing::debug;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

pub const UPLOAD_IN_PROGRESS_MESSAGE: &str = "Uploading...";
const LIST_FAILED_MESSAGE: &str = "Could not load the PDF list.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading(RequestSeq),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting(RequestSeq),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading(RequestSeq),
}

/// What the answer box currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnswerArea {
    #[default]
    Empty,
    Notice(String),
    Answer {
        text: String,
        cached: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SetQuestion(String),
    SetKeyword(String),
    SelectDocument(String),
    ChooseFile(Option<PathBuf>),
    Submit,
    Upload,
    Refresh,
}

/// Phase each machine was in before its latest request was issued. Restored
/// when that request never reaches the worker, so an earlier request still
/// in flight stays accepted.
#[derive(Debug, Default)]
struct Superseded {
    list: ListPhase,
    submit: SubmitPhase,
    upload: UploadPhase,
}

#[derive(Debug, Default)]
pub struct FormState {
    question: String,
    keyword: String,
    documents: Vec<DocumentRef>,
    selected: Option<DocumentName>,
    file: Option<PathBuf>,
    answer: AnswerArea,
    upload_message: Option<String>,
    status: Option<String>,
    last_error: Option<UiError>,
    list_phase: ListPhase,
    submit_phase: SubmitPhase,
    upload_phase: UploadPhase,
    superseded: Superseded,
    last_seq: u64,
}

impl FormState {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn documents(&self) -> &[DocumentRef] {
        &self.documents
    }

    pub fn selected(&self) -> Option<&DocumentName> {
        self.selected.as_ref()
    }

    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    pub fn answer(&self) -> &AnswerArea {
        &self.answer
    }

    pub fn upload_message(&self) -> Option<&str> {
        self.upload_message.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn list_phase(&self) -> ListPhase {
        self.list_phase
    }

    pub fn submit_phase(&self) -> SubmitPhase {
        self.submit_phase
    }

    pub fn upload_phase(&self) -> UploadPhase {
        self.upload_phase
    }

    pub fn is_idle(&self) -> bool {
        self.list_phase == ListPhase::Idle
            && self.submit_phase == SubmitPhase::Idle
            && self.upload_phase == UploadPhase::Idle
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Initial document fetch.
    pub fn mount(&mut self) -> BackendCommand {
        self.start_list()
    }

    pub fn handle(&mut self, action: UserAction) -> Option<BackendCommand> {
        match action {
            UserAction::SetQuestion(question) => {
                self.question = question;
                None
            }
            UserAction::SetKeyword(keyword) => {
                self.keyword = keyword;
                None
            }
            UserAction::SelectDocument(name) => {
                self.select_document(name);
                None
            }
            UserAction::ChooseFile(path) => {
                self.file = path;
                None
            }
            UserAction::Submit => self.submit(),
            UserAction::Upload => self.upload(),
            UserAction::Refresh => Some(self.start_list()),
        }
    }

    pub fn apply(&mut self, event: UiEvent) -> Option<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = Some(message);
                None
            }
            UiEvent::Error(error) => {
                self.status = Some(error.message().to_string());
                self.last_error = Some(error);
                None
            }
            UiEvent::DocumentsLoaded { seq, listing } => {
                if self.list_phase != ListPhase::Loading(seq) {
                    debug!(%seq, "discarding stale document list");
                    return None;
                }
                self.list_phase = ListPhase::Idle;
                self.documents = listing.documents;
                self.selected = self.documents.first().map(|document| document.name.clone());
                self.record_failure(
                    UiErrorContext::ListDocuments,
                    listing.failure,
                    LIST_FAILED_MESSAGE,
                );
                None
            }
            UiEvent::AnswerReady { seq, outcome } => {
                if self.submit_phase != SubmitPhase::Submitting(seq) {
                    debug!(%seq, "discarding stale answer");
                    return None;
                }
                self.submit_phase = SubmitPhase::Idle;
                self.record_failure(UiErrorContext::Query, outcome.failure, &outcome.answer_text);
                self.answer = AnswerArea::Answer {
                    text: outcome.answer_text,
                    cached: outcome.was_cached,
                };
                None
            }
            UiEvent::UploadFinished { seq, outcome } => {
                if self.upload_phase != UploadPhase::Uploading(seq) {
                    debug!(%seq, "discarding stale upload result");
                    return None;
                }
                self.upload_phase = UploadPhase::Idle;
                self.record_failure(UiErrorContext::Upload, outcome.failure, &outcome.message);
                self.upload_message = Some(outcome.message);
                self.file = None;
                Some(self.start_list())
            }
            UiEvent::UploadRejected { seq, error } => {
                if self.upload_phase != UploadPhase::Uploading(seq) {
                    debug!(%seq, "discarding stale upload rejection");
                    return None;
                }
                self.upload_phase = UploadPhase::Idle;
                self.upload_message = Some(error.to_string());
                self.last_error = Some(UiError::validation(UiErrorContext::Upload, &error));
                self.file = None;
                None
            }
        }
    }

    /// Rolls a machine back to the phase it was in before `command` was
    /// issued, for commands that never reached the worker.
    pub fn abandon(&mut self, command: &BackendCommand) {
        let seq = command.seq();
        match command {
            BackendCommand::ListDocuments { .. } if self.list_phase == ListPhase::Loading(seq) => {
                self.list_phase = mem::take(&mut self.superseded.list);
            }
            BackendCommand::AskQuestion { .. }
                if self.submit_phase == SubmitPhase::Submitting(seq) =>
            {
                self.submit_phase = mem::take(&mut self.superseded.submit);
            }
            BackendCommand::UploadDocument { .. }
                if self.upload_phase == UploadPhase::Uploading(seq) =>
            {
                self.upload_phase = mem::take(&mut self.superseded.upload);
                if self.upload_phase == UploadPhase::Idle {
                    self.upload_message = None;
                }
            }
            _ => {}
        }
    }

    fn next_seq(&mut self) -> RequestSeq {
        self.last_seq += 1;
        RequestSeq(self.last_seq)
    }

    fn start_list(&mut self) -> BackendCommand {
        let seq = self.next_seq();
        self.superseded.list = self.list_phase;
        self.list_phase = ListPhase::Loading(seq);
        BackendCommand::ListDocuments { seq }
    }

    fn select_document(&mut self, name: String) {
        if self
            .documents
            .iter()
            .any(|document| document.name.as_str() == name)
        {
            self.selected = Some(DocumentName(name));
            self.status = None;
        } else {
            let error = ValidationError::UnknownDocument(name);
            self.status = Some(error.to_string());
            self.last_error = Some(UiError::validation(UiErrorContext::Form, &error));
        }
    }

    fn query_request(&self) -> Result<QueryRequest, ValidationError> {
        if self.question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        let document = self
            .selected
            .clone()
            .ok_or(ValidationError::NoDocumentSelected)?;
        Ok(QueryRequest::new(
            self.question.clone(),
            Some(self.keyword.as_str()),
            document,
        ))
    }

    fn submit(&mut self) -> Option<BackendCommand> {
        let request = match self.query_request() {
            Ok(request) => request,
            Err(error) => {
                self.answer = AnswerArea::Notice(error.to_string());
                self.last_error = Some(UiError::validation(UiErrorContext::Query, &error));
                return None;
            }
        };
        let seq = self.next_seq();
        self.superseded.submit = self.submit_phase;
        self.submit_phase = SubmitPhase::Submitting(seq);
        self.answer = AnswerArea::Empty;
        Some(BackendCommand::AskQuestion { seq, request })
    }

    fn upload(&mut self) -> Option<BackendCommand> {
        let Some(path) = self.file.clone() else {
            let error = ValidationError::NoFileSelected;
            self.upload_message = Some(error.to_string());
            self.last_error = Some(UiError::validation(UiErrorContext::Upload, &error));
            return None;
        };
        let seq = self.next_seq();
        self.superseded.upload = self.upload_phase;
        self.upload_phase = UploadPhase::Uploading(seq);
        self.upload_message = Some(UPLOAD_IN_PROGRESS_MESSAGE.to_string());
        Some(BackendCommand::UploadDocument { seq, path })
    }

    fn record_failure(
        &mut self,
        context: UiErrorContext,
        failure: Option<ClientErrorKind>,
        message: &str,
    ) {
        match failure {
            Some(kind) => {
                self.last_error = Some(UiError::from_client_kind(context, kind, message));
            }
            None => {
                if self
                    .last_error
                    .as_ref()
                    .is_some_and(|error| error.context() == context)
                {
                    self.last_error = None;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
