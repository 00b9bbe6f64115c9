//! Backend->UI events and error modeling for the form controller.

use client_core::{ClientErrorKind, DocumentListing, QueryOutcome, UploadOutcome};
use shared::error::ValidationError;

use crate::controller::reducer::RequestSeq;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    DocumentsLoaded {
        seq: RequestSeq,
        listing: DocumentListing,
    },
    AnswerReady {
        seq: RequestSeq,
        outcome: QueryOutcome,
    },
    UploadFinished {
        seq: RequestSeq,
        outcome: UploadOutcome,
    },
    UploadRejected {
        seq: RequestSeq,
        error: ValidationError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Validation,
    Configuration,
    Startup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    ListDocuments,
    Upload,
    Query,
    Form,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_client_kind(
        context: UiErrorContext,
        kind: ClientErrorKind,
        message: impl Into<String>,
    ) -> Self {
        let category = match kind {
            ClientErrorKind::Network | ClientErrorKind::Status => UiErrorCategory::Transport,
            ClientErrorKind::Decode => UiErrorCategory::Decode,
            ClientErrorKind::InvalidUrl => UiErrorCategory::Configuration,
        };
        Self::new(category, context, message)
    }

    pub fn validation(context: UiErrorContext, error: &ValidationError) -> Self {
        Self::new(UiErrorCategory::Validation, context, error.to_string())
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
