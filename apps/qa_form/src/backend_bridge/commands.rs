//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::QueryRequest;

use crate::controller::reducer::RequestSeq;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    ListDocuments {
        seq: RequestSeq,
    },
    AskQuestion {
        seq: RequestSeq,
        request: QueryRequest,
    },
    UploadDocument {
        seq: RequestSeq,
        path: PathBuf,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListDocuments { .. } => "list_documents",
            Self::AskQuestion { .. } => "ask_question",
            Self::UploadDocument { .. } => "upload_document",
        }
    }

    pub fn seq(&self) -> RequestSeq {
        match self {
            Self::ListDocuments { seq }
            | Self::AskQuestion { seq, .. }
            | Self::UploadDocument { seq, .. } => *seq,
        }
    }
}
