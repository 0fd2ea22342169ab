//! What the classifier accepts: a transport failure or a structured provider error.

use models::ErrorResponse;

use thiserror::Error as ThisError;

/// A failed provider call as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ApiFailure {
    /// No structured code available: connection refused, timeout, DNS, ...
    #[error("Network Error: {message}")]
    Network { message: String },

    #[error("{0}")]
    Api(ErrorResponse),
}

impl ApiFailure {
    pub fn network(message: impl Into<String>) -> Self {
        ApiFailure::Network {
            message: message.into(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiFailure::Network { .. })
    }

    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiFailure::Api(response) => Some(response),
            ApiFailure::Network { .. } => None,
        }
    }
}

impl From<ErrorResponse> for ApiFailure {
    fn from(response: ErrorResponse) -> Self {
        ApiFailure::Api(response)
    }
}

/// Errors that can tell whether they represent provider rate limiting.
///
/// [`BackoffRetrier`](crate::retry::BackoffRetrier) retries only errors for
/// which this returns `true`.
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

impl RateLimitSignal for ErrorResponse {
    fn is_rate_limited(&self) -> bool {
        ErrorResponse::is_rate_limited(self)
    }
}

impl RateLimitSignal for ApiFailure {
    fn is_rate_limited(&self) -> bool {
        self.response().is_some_and(ErrorResponse::is_rate_limited)
    }
}
