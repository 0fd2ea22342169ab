//! Provider error codes understood by the recovery engine.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of structured error codes produced by the account-provider API.
///
/// Any code string not listed here decodes to [`ErrorCode::Unknown`], so
/// decoding a code never fails. New codes are added as new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    SnaptradeNotRegistered,
    SnaptradeUserMismatch,
    SignatureInvalid,
    RateLimited,
    ConnectionDisabled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::SnaptradeNotRegistered,
        ErrorCode::SnaptradeUserMismatch,
        ErrorCode::SignatureInvalid,
        ErrorCode::RateLimited,
        ErrorCode::ConnectionDisabled,
        ErrorCode::Unknown,
    ];

    /// Wire representation, e.g. `"RATE_LIMITED"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SnaptradeNotRegistered => "SNAPTRADE_NOT_REGISTERED",
            ErrorCode::SnaptradeUserMismatch => "SNAPTRADE_USER_MISMATCH",
            ErrorCode::SignatureInvalid => "SIGNATURE_INVALID",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ConnectionDisabled => "CONNECTION_DISABLED",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Total decode from a wire string; unrecognized codes become `Unknown`.
    pub fn from_wire(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|known| known.as_str() == code)
            .unwrap_or(ErrorCode::Unknown)
    }
}

impl FromStr for ErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_wire(s))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
