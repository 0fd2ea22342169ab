//! HTTP status code utilities for the account-provider boundary.

use serde::{Deserialize, Serialize};

/// HTTP status code attached to provider error responses.
///
/// Stored directly rather than parsed from error messages. Serialized as a
/// bare integer so it matches the `httpStatus` wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const TOO_MANY_REQUESTS: HttpStatusCode = HttpStatusCode(429);

    /// 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    pub fn is_too_many_requests(&self) -> bool {
        *self == Self::TOO_MANY_REQUESTS
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
