//! Error types for the Todoist Sync API client.
//!
//! # Design
//! Every failure a call can produce is a variant of [`Error`]. Server-reported
//! failures (a non-200 status, or a non-"ok" `sync_status` entry inside a 200
//! batch response) share one shape, [`ApiError`], whose [`ErrorKind`] records
//! which of the two happened and, for status errors, which status. A body that
//! could not be decoded is reported as [`Error::Decode`] so callers can tell
//! "the server sent garbage" apart from "the server reported error X".

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The client was configured without an API token.
    #[error("must provide an API token")]
    RequiredToken,

    /// The configured base URL is not an absolute URL.
    #[error("invalid base url {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A request field could not be serialized to JSON.
    #[error("unable to serialize {field}")]
    Serialize {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP round-trip failed before a response was received.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The call context was canceled.
    #[error("context canceled")]
    Canceled,

    /// The call context's deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The server reported an error, either through the status code or a
    /// per-command `sync_status` entry.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response body could not be decoded into the expected shape.
    #[error("unable to decode response body")]
    Decode(#[source] serde_json::Error),

    /// The raw response body could not be written to the caller's sink.
    #[error("unable to write response body")]
    Io(#[from] std::io::Error),

    /// A lookup by id or name found no matching resource.
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },
}

impl Error {
    /// True for errors detected before any network I/O.
    pub fn is_build(&self) -> bool {
        matches!(
            self,
            Error::RequiredToken | Error::InvalidBaseUrl { .. } | Error::Serialize { .. }
        )
    }

    /// The server-reported error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Which class of server error an [`ApiError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400: the request was incorrect.
    BadRequest,
    /// 401: authentication is required and has failed or is missing.
    Unauthorized,
    /// 403: the request was valid but forbidden.
    Forbidden,
    /// 404: the requested resource could not be found.
    NotFound,
    /// 429: too many requests in a given amount of time.
    TooManyRequests,
    /// 500: the request failed due to a server error.
    Internal,
    /// 503: the server is currently unable to handle the request.
    Unavailable,
    /// Any other status code.
    Unknown,
    /// A command inside a 200 batch response failed.
    Sync,
}

impl ErrorKind {
    /// Map a non-200 status to its kind. Statuses without a dedicated kind
    /// return `None`.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(ErrorKind::BadRequest),
            401 => Some(ErrorKind::Unauthorized),
            403 => Some(ErrorKind::Forbidden),
            404 => Some(ErrorKind::NotFound),
            429 => Some(ErrorKind::TooManyRequests),
            500 => Some(ErrorKind::Internal),
            503 => Some(ErrorKind::Unavailable),
            _ => None,
        }
    }
}

/// A server-reported error with the diagnostic fields of the Sync API error
/// payload.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("({http_code}) {tag}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub tag: String,
    pub code: Option<i64>,
    pub message: String,
    pub http_code: u16,
    pub extra: Map<String, Value>,
    /// Correlation id of the failing command. Only set for [`ErrorKind::Sync`].
    pub command_id: Option<String>,
}

pub(crate) const UNKNOWN_ERROR_TAG: &str = "UNKNOWN_ERROR";

impl ApiError {
    /// The error synthesized for status codes the API does not document.
    pub(crate) fn unknown(status: u16) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            tag: UNKNOWN_ERROR_TAG.to_string(),
            code: None,
            message: "Unknown error occurred.".to_string(),
            http_code: status,
            extra: Map::new(),
            command_id: None,
        }
    }

    /// How long the server asked the caller to wait, when it said so.
    pub fn retry_after(&self) -> Option<u64> {
        self.extra.get("retry_after").and_then(Value::as_u64)
    }
}

/// The error payload as it appears on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorPayload {
    error_tag: Option<String>,
    error_code: Option<i64>,
    error: Option<String>,
    http_code: Option<u16>,
    error_extra: Option<Map<String, Value>>,
}

impl ErrorPayload {
    pub(crate) fn into_api_error(
        self,
        kind: ErrorKind,
        status: u16,
        command_id: Option<String>,
    ) -> ApiError {
        ApiError {
            kind,
            tag: self.error_tag.unwrap_or_default(),
            code: self.error_code,
            message: self.error.unwrap_or_default(),
            http_code: self.http_code.unwrap_or(status),
            extra: self.error_extra.unwrap_or_default(),
            command_id,
        }
    }
}
