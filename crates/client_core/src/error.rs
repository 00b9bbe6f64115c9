//! Transport error taxonomy for calls against the question-answering backend.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("{endpoint} returned a malformed body: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
}

/// Copyable classification of a [`ClientError`], kept next to degraded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientErrorKind {
    InvalidUrl,
    Network,
    Status,
    Decode,
}

impl ClientError {
    pub fn kind(&self) -> ClientErrorKind {
        match self {
            Self::InvalidUrl { .. } => ClientErrorKind::InvalidUrl,
            Self::Build(_) | Self::Network { .. } => ClientErrorKind::Network,
            Self::Status { .. } => ClientErrorKind::Status,
            Self::Decode { .. } => ClientErrorKind::Decode,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl ClientErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::Network => "network",
            Self::Status => "status",
            Self::Decode => "decode",
        }
    }
}
