use crate::error::FlintError;

use common::ErrorLocation;
use models::{ErrorResponse, RecoveryDirective};
use recovery_core::events::{EventSink, LogEventSink, RecoveryEvent};
use recovery_core::{ApiFailure, classify};

use std::panic::Location;

use log::debug;

/// Decode an `ErrorResponse` JSON document into a failure.
pub fn parse_failure(input: &str) -> Result<ApiFailure, FlintError> {
    let response: ErrorResponse =
        serde_json::from_str(input.trim()).map_err(|e| FlintError::Input {
            message: format!("Invalid ErrorResponse JSON: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
    Ok(ApiFailure::Api(response))
}

/// Classify a structured error document, or a transport failure when
/// `network` is given.
pub fn run(input: Option<&str>, network: Option<&str>) -> Result<RecoveryDirective, FlintError> {
    let failure = match (network, input) {
        (Some(message), _) => ApiFailure::network(message),
        (None, Some(input)) => parse_failure(input)?,
        (None, None) => {
            return Err(FlintError::Input {
                message: String::from("Nothing to classify"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let directive = classify(&failure);
    debug!("Classified {failure} as {:?}", directive.action());
    LogEventSink.record(RecoveryEvent::classified(&failure, &directive));

    Ok(directive)
}
