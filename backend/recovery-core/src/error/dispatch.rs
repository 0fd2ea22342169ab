use crate::error::PortalError;

use common::ErrorLocation;
use models::RecoveryDirective;

use thiserror::Error as ThisError;

/// Failures while carrying out a directive.
///
/// A portal failure is itself classified, so the caller can show the
/// secondary message and action instead of dropping the error.
#[derive(Debug, ThisError)]
pub enum DispatchError {
    #[error("Portal Error: {source} {location}")]
    Portal {
        directive: RecoveryDirective,
        location: ErrorLocation,
        #[source]
        source: PortalError,
    },

    #[error("Present Error: {message} {location}")]
    Present {
        message: String,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}

impl DispatchError {
    /// Directive for the secondary failure, if one was classified.
    pub fn directive(&self) -> Option<&RecoveryDirective> {
        match self {
            DispatchError::Portal { directive, .. } => Some(directive),
            DispatchError::Present { .. } => None,
        }
    }
}
