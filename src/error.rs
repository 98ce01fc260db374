use reqwest::StatusCode;
use thiserror::Error;

use crate::model::ResultEnvelope;

/// Summary carried by [`Error::InvalidSeries`].
pub const INVALID_SERIES_SUMMARY: &str = "An invalid series was requested";

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the client.
///
/// `RequestFailed` and `InvalidSeries` are reported by the server inside an
/// otherwise well-formed response; both keep the decoded envelope so the
/// caller can still inspect messages or partial data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed API response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("could not reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed: HTTP {status} for url ({url})\n{body}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("{status}")]
    RequestFailed {
        status: String,
        messages: Vec<String>,
        envelope: Box<ResultEnvelope>,
    },

    #[error("{}", INVALID_SERIES_SUMMARY)]
    InvalidSeries {
        messages: Vec<String>,
        envelope: Box<ResultEnvelope>,
    },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedResponse,
    Transport,
    RequestFailed,
    InvalidSeries,
    InvalidRequest,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Error::Transport { .. } | Error::HttpStatus { .. } => ErrorKind::Transport,
            Error::RequestFailed { .. } => ErrorKind::RequestFailed,
            Error::InvalidSeries { .. } => ErrorKind::InvalidSeries,
            Error::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// Messages sent by the server, in the order received. Empty for errors
    /// that did not come from a decoded response.
    pub fn details(&self) -> &[String] {
        match self {
            Error::RequestFailed { messages, .. } | Error::InvalidSeries { messages, .. } => {
                messages.as_slice()
            }
            _ => &[],
        }
    }

    /// The decoded response that accompanied an application-level failure.
    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        match self {
            Error::RequestFailed { envelope, .. } | Error::InvalidSeries { envelope, .. } => {
                Some(&**envelope)
            }
            _ => None,
        }
    }

    pub fn into_envelope(self) -> Option<ResultEnvelope> {
        match self {
            Error::RequestFailed { envelope, .. } | Error::InvalidSeries { envelope, .. } => {
                Some(*envelope)
            }
            _ => None,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            message: message.into(),
        }
    }
}
