use std::fmt;

use serde::Deserialize;

/// Errors surfaced by library-level operations (raw collection fetches).
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The server answered with a non-2xx status.
    #[error("API error {status} ({code}): {message}")]
    Api { code: String, message: String, status: u16 },

    /// The server could not be reached (connect, DNS, timeout, body read).
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {endpoint}: {detail}")]
    UnexpectedShape { endpoint: String, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ContentResult<T> = Result<T, ContentError>;

impl ContentError {
    pub(crate) fn network(source: reqwest::Error) -> Self {
        let message = if source.is_timeout() {
            "request timed out".to_string()
        } else if source.is_connect() {
            "connection failed, is WordPress running?".to_string()
        } else {
            source.to_string()
        };
        ContentError::Network { message, source }
    }

    pub(crate) fn shape(endpoint: &str, detail: impl Into<String>) -> Self {
        ContentError::UnexpectedShape { endpoint: endpoint.to_string(), detail: detail.into() }
    }

    /// Build an API error from a non-2xx response body. WordPress sends
    /// `{code, message, data: {status}}`; anything else maps to `api_error`.
    pub(crate) fn from_error_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(b) => ContentError::Api { code: b.code, message: b.message, status },
            Err(_) => ContentError::Api {
                code: "api_error".to_string(),
                message: format!("API Error: {status}"),
                status,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

/// A record that failed shape or value checks. Logged and dropped, never returned
/// from collection fetches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

/// Why a soft operation returned its fallback instead of fresh content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Api { code: String, status: u16 },
    Network(String),
    NotFound(String),
    Invalid(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Api { code, status } => write!(f, "api error {status} ({code})"),
            FallbackReason::Network(m) => write!(f, "network error: {m}"),
            FallbackReason::NotFound(what) => write!(f, "not found: {what}"),
            FallbackReason::Invalid(m) => write!(f, "invalid content: {m}"),
        }
    }
}

impl std::error::Error for FallbackReason {}

impl From<&ContentError> for FallbackReason {
    fn from(err: &ContentError) -> Self {
        match err {
            ContentError::Api { code, status, .. } => FallbackReason::Api { code: code.clone(), status: *status },
            ContentError::Network { message, .. } => FallbackReason::Network(message.clone()),
            ContentError::UnexpectedShape { detail, .. } => FallbackReason::Invalid(detail.clone()),
            ContentError::Config(m) => FallbackReason::Invalid(m.clone()),
        }
    }
}

impl From<ContentError> for FallbackReason {
    fn from(err: ContentError) -> Self { FallbackReason::from(&err) }
}

/// The value a soft operation substituted, together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback<T> {
    pub value: T,
    pub reason: FallbackReason,
}

impl<T> Fallback<T> {
    pub fn new(value: T, reason: impl Into<FallbackReason>) -> Self {
        Self { value, reason: reason.into() }
    }
}

/// Collapse a soft result into its value, fresh or substituted.
pub trait OrFallback<T> {
    fn or_fallback(self) -> T;
}

impl<T> OrFallback<T> for Result<T, Fallback<T>> {
    fn or_fallback(self) -> T {
        match self {
            Ok(v) => v,
            Err(f) => f.value,
        }
    }
}
