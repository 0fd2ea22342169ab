//! Shared building blocks for Flint's recovery workspace.
//!
//! Everything here is dependency-light and used by every other crate:
//! error location capture for structured errors, and HTTP status helpers
//! for the account-provider boundary.
//!
//! ## Architecture
//!
//! - **common** (this crate): Location tracking and status codes
//! - **models**: Pure data (error codes, directives, connections)
//! - **recovery-core**: Classification, dispatch and retry logic
//! - **flint-recovery**: Command-line wiring

pub mod error;
pub mod http_status;


pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;
