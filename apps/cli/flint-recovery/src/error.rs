use common::ErrorLocation;
use models::RecoveryDirective;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by CLI commands.
///
/// Printed as JSON on stderr when a command fails, so scripts get the
/// same structured information the log does.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum FlintError {
    /// Error from this app
    #[error("Flint Error: {message} {location}")]
    Flint {
        message: String,
        location: ErrorLocation,
    },

    /// Input could not be read or decoded
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    /// Error from recovery-core (config, portal, dispatch)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Recovery itself failed; `directive` says what to tell the user next
    #[error("Recovery Error: {message} {location}")]
    Recovery {
        message: String,
        directive: RecoveryDirective,
        location: ErrorLocation,
    },
}
