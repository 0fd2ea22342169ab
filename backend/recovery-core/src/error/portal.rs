//! Errors raised while obtaining a reconnect/registration portal URL.
//!
//! - HTTP status codes travel inside the decoded `ErrorResponse`, not in strings
//! - Transport failures keep the timeout/connect distinction from reqwest
//! - Every variant converts to an [`ApiFailure`] so it can be classified

use crate::failure::{ApiFailure, RateLimitSignal};

use common::{ErrorLocation, HttpStatusCode};
use models::{ErrorCode, ErrorResponse};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PortalError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Provider Error: {response} {location}")]
    Api {
        response: ErrorResponse,
        location: ErrorLocation,
    },

    #[error("Portal response did not contain a portalUrl {location}")]
    MissingUrl { location: ErrorLocation },
}

impl PortalError {
    #[track_caller]
    pub fn missing_url() -> Self {
        PortalError::MissingUrl {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Build from a non-2xx response body.
    ///
    /// Uses the body's `ErrorResponse` when it has one. Otherwise synthesizes
    /// one: `RATE_LIMITED` for 429, `UNKNOWN` for everything else.
    #[track_caller]
    pub fn from_error_body(status_code: u16, body: &str) -> Self {
        let status = HttpStatusCode(status_code);

        let response = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(mut parsed) => {
                parsed.http_status.get_or_insert(status);
                parsed
            }
            Err(_) => {
                let code = if status.is_too_many_requests() {
                    ErrorCode::RateLimited
                } else {
                    ErrorCode::Unknown
                };
                let message = if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status} - {}", body.trim())
                };
                ErrorResponse::new(code, message).with_http_status(status)
            }
        };

        PortalError::Api {
            response,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The failure as the classifier sees it.
    pub fn failure(&self) -> ApiFailure {
        match self {
            PortalError::Http { message, .. } => ApiFailure::network(message.clone()),
            PortalError::Api { response, .. } => ApiFailure::Api(response.clone()),
            PortalError::Json { message, .. } | PortalError::UrlParse { message, .. } => {
                ApiFailure::Api(ErrorResponse::new(
                    ErrorCode::Unknown,
                    format!("Invalid portal response: {message}"),
                ))
            }
            PortalError::MissingUrl { .. } => ApiFailure::Api(ErrorResponse::new(
                ErrorCode::Unknown,
                "Invalid portal response: missing portalUrl",
            )),
        }
    }

    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            PortalError::Api { response, .. } => response.http_status,
            _ => None,
        }
    }
}

impl RateLimitSignal for PortalError {
    fn is_rate_limited(&self) -> bool {
        matches!(self, PortalError::Api { response, .. } if response.is_rate_limited())
    }
}

impl From<url::ParseError> for PortalError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        PortalError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for PortalError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        PortalError::Http {
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for PortalError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        PortalError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
