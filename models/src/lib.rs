//! Domain models for Flint's connection recovery.
//!
//! Pure data shared between the provider boundary, the recovery engine and
//! the presentation layer. No business logic lives here beyond validation
//! and wire-shape conversion.

pub mod connection;
pub mod directive;
pub mod error;
pub mod error_code;
pub mod error_response;

#[cfg(test)]
mod tests;

pub use common::ErrorLocation;
pub use connection::builder::ConnectionRecordBuilder;
pub use connection::{ConnectionRecord, ConnectionStatus};
pub use directive::{RecoveryAction, RecoveryDirective};
pub use error::model_error::ModelError;
pub use error_code::ErrorCode;
pub use error_response::{ErrorDetail, ErrorResponse};
