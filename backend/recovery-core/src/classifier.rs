//! Maps provider failures to recovery directives.
//!
//! Classification is a pure, total function: the same failure always yields
//! the same directive, nothing is logged or recorded, and every input has a
//! directive. Unrecognized codes have already folded into
//! [`ErrorCode::Unknown`] at decode time and take the retry arm below.
//!
//! | Code | Action | Delay |
//! |---|---|---|
//! | transport failure | retry | 3000 ms |
//! | `SNAPTRADE_NOT_REGISTERED` | register | |
//! | `SNAPTRADE_USER_MISMATCH` | register | |
//! | `SIGNATURE_INVALID` | reconnect | |
//! | `RATE_LIMITED` | retry | 5000 ms |
//! | `CONNECTION_DISABLED` | reconnect | |
//! | `UNKNOWN` | retry | 3000 ms |

use crate::failure::ApiFailure;

use models::{ConnectionRecord, ConnectionStatus, ErrorCode, ErrorResponse, RecoveryDirective};

use std::time::Duration;

pub const NETWORK_RETRY_DELAY: Duration = Duration::from_millis(3000);
pub const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_millis(5000);
pub const UNKNOWN_RETRY_DELAY: Duration = Duration::from_millis(3000);

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const NOT_REGISTERED_MESSAGE: &str =
    "Your brokerage account is not registered yet. Complete registration to continue.";
pub const USER_MISMATCH_MESSAGE: &str =
    "Your brokerage registration does not match this account. Please register again.";
pub const SIGNATURE_INVALID_MESSAGE: &str =
    "Authentication expired. Please reconnect your brokerage account.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Retrying shortly.";
pub const CONNECTION_DISABLED_MESSAGE: &str =
    "This connection has been disabled. Reconnect it to resume syncing.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Classify any provider failure.
pub fn classify(failure: &ApiFailure) -> RecoveryDirective {
    match failure {
        ApiFailure::Network { .. } => {
            RecoveryDirective::retry(Some(NETWORK_RETRY_DELAY), NETWORK_ERROR_MESSAGE)
        }
        ApiFailure::Api(response) => classify_response(response),
    }
}

/// Classify a structured provider error by its code.
pub fn classify_response(response: &ErrorResponse) -> RecoveryDirective {
    match response.code() {
        ErrorCode::SnaptradeNotRegistered => RecoveryDirective::register(NOT_REGISTERED_MESSAGE),
        ErrorCode::SnaptradeUserMismatch => RecoveryDirective::register(USER_MISMATCH_MESSAGE),
        ErrorCode::SignatureInvalid => RecoveryDirective::reconnect(SIGNATURE_INVALID_MESSAGE),
        ErrorCode::RateLimited => {
            RecoveryDirective::retry(Some(RATE_LIMIT_RETRY_DELAY), RATE_LIMITED_MESSAGE)
        }
        ErrorCode::ConnectionDisabled => RecoveryDirective::reconnect(CONNECTION_DISABLED_MESSAGE),
        ErrorCode::Unknown => {
            let message = match response.message().trim() {
                "" => UNKNOWN_ERROR_MESSAGE,
                _ => response.message(),
            };
            RecoveryDirective::retry(Some(UNKNOWN_RETRY_DELAY), message)
        }
    }
}

/// Directive for a connection that is not healthy, `None` otherwise.
pub fn classify_connection(record: &ConnectionRecord) -> Option<RecoveryDirective> {
    match record.status() {
        ConnectionStatus::Healthy => None,
        ConnectionStatus::Disabled => Some(classify_response(&ErrorResponse::new(
            ErrorCode::ConnectionDisabled,
            "",
        ))),
        ConnectionStatus::NeedsReconnect => Some(RecoveryDirective::reconnect(format!(
            "{} needs to be reconnected to keep syncing.",
            record.name
        ))),
    }
}
