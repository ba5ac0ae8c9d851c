use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Network,
    Timeout,
    Authentication,
    Authorization,
    Validation,
    NotFound,
    RateLimited,
    Server,
    Deserialization,
    Cancelled,
    Unknown,
}

impl FetchErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Authentication => "AUTH_ERROR",
            Self::Authorization => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::Server => "SERVER_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::RateLimited | Self::Server
        )
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Failure outcome of a single fetch against the data collaborator.
///
/// Stored on the fetch state for the view layer to render inline; never
/// thrown past the controller boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("[{kind}] {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl FetchError {
    #[must_use]
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Network, message)
    }

    #[must_use]
    pub fn timeout() -> Self {
        Self::new(FetchErrorKind::Timeout, "the request timed out")
    }

    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Maps an HTTP status (and optional response body) onto the
    /// taxonomy, preferring the server-provided message when the body
    /// parses.
    #[must_use]
    pub fn from_http_status(status: u16, body: Option<&[u8]>) -> Self {
        let kind = match status {
            400 | 422 => FetchErrorKind::Validation,
            401 => FetchErrorKind::Authentication,
            403 => FetchErrorKind::Authorization,
            404 => FetchErrorKind::NotFound,
            408 => FetchErrorKind::Timeout,
            429 => FetchErrorKind::RateLimited,
            500..=599 => FetchErrorKind::Server,
            _ => FetchErrorKind::Unknown,
        };

        let message = body
            .and_then(|b| serde_json::from_slice::<ApiErrorResponse>(b).ok())
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error: {status}"));

        Self::new(kind, message).with_http_status(status)
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            FetchErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            FetchErrorKind::Timeout => "The request timed out. Please try again.".into(),
            FetchErrorKind::Authentication => {
                "Your session has expired. Please sign in again.".into()
            }
            FetchErrorKind::Authorization => {
                "You don't have permission to view this list.".into()
            }
            FetchErrorKind::Validation => self.message.clone(),
            FetchErrorKind::NotFound => "The requested data could not be found.".into(),
            FetchErrorKind::RateLimited => {
                "Too many requests. Please wait a moment and try again.".into()
            }
            FetchErrorKind::Server => {
                "The server hit a problem. Please try again in a moment.".into()
            }
            FetchErrorKind::Deserialization => {
                "A data error occurred. Please contact support if this persists.".into()
            }
            FetchErrorKind::Cancelled | FetchErrorKind::Unknown => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<HashMap<String, String>>,
}
