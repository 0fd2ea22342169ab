//! Structured error payload returned by the account-provider API layer.

use crate::ErrorCode;

use common::HttpStatusCode;

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Code and message of a provider failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
}

/// `{ "error": { "code", "message" }, "httpStatus"? }`
///
/// Read-only once decoded. Also usable as an error type so provider
/// operations can return it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<HttpStatusCode>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code,
                message: message.into(),
            },
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: impl Into<HttpStatusCode>) -> Self {
        self.http_status = Some(status.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }

    pub fn is_rate_limited(&self) -> bool {
        self.error.code == ErrorCode::RateLimited
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (HTTP {status}): {}", self.error.code, self.error.message),
            None => write!(f, "{}: {}", self.error.code, self.error.message),
        }
    }
}

impl StdError for ErrorResponse {}
