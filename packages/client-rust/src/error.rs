//! Request error taxonomy.
//!
//! A failed [`send`](crate::Request::send) returns exactly one
//! [`RequestError`]. Transport and parsing errors never escape raw; they are
//! mapped into this enum at the engine boundary.

use crate::request::RequestState;

/// Kind of business rejection reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Generic ERROR notification.
    Rejected,
    /// The tracking number is unknown to the tracking service.
    InvalidTrackingNumber,
    /// No location matches the postal code.
    PostalCodeNotFound,
    /// The postal code is malformed for its country.
    InvalidPostalCodeFormat,
}

impl RemoteErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::InvalidTrackingNumber => "invalid tracking number",
            Self::PostalCodeNotFound => "postal code not found",
            Self::InvalidPostalCodeFormat => "invalid postal code format",
        }
    }
}

/// ERROR-severity notification turned into an error value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{}", .kind.as_str(), describe(.code.as_deref(), .message.as_deref()))]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl RemoteError {
    #[must_use]
    pub fn new(kind: RemoteErrorKind, code: Option<String>, message: Option<String>) -> Self {
        Self {
            kind,
            code,
            message,
        }
    }
}

/// Errors returned by request construction and [`send`](crate::Request::send).
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Credentials, version or schema set-up is wrong. Not retryable.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },
    /// The request does not conform to the service schema. The caller must
    /// fix the payload.
    #[error("schema validation failed: {detail}")]
    SchemaValidation { detail: String },
    /// FAILURE notification or unreachable service. The caller may retry.
    #[error("remote failure{}", describe(.code.as_deref(), .message.as_deref()))]
    RemoteFailure {
        code: Option<String>,
        message: Option<String>,
    },
    /// ERROR notification. The request data needs correcting.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// `send` was called on a request that has already been dispatched.
    #[error("request already sent (state {state})")]
    AlreadySent { state: RequestState },
}

impl RequestError {
    /// Whether retrying the same request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteFailure { .. })
    }

    /// Remote code carried by the error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::RemoteFailure { code, .. } => code.as_deref(),
            Self::Remote(err) => err.code.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn configuration(reason: impl std::fmt::Display) -> Self {
        Self::Configuration {
            reason: reason.to_string(),
        }
    }
}

fn describe(code: Option<&str>, message: Option<&str>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!(" [{code}]: {message}"),
        (Some(code), None) => format!(" [{code}]"),
        (None, Some(message)) => format!(": {message}"),
        (None, None) => String::new(),
    }
}
