pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod failure;
pub mod portal;
pub mod retry;


pub use classifier::{classify, classify_connection, classify_response};
pub use dispatcher::{DispatchContext, DispatchOutcome, RecoveryDispatcher, RetryHandle};
pub use failure::{ApiFailure, RateLimitSignal};
pub use retry::{BackoffRetrier, RetryPolicy};

pub const FLINT_API_HOSTNAME: &str = "127.0.0.1";
pub const FLINT_API_PORT: u16 = 5000;
pub const FLINT_API_DEFAULT_BASE_URL: &str =
    const_format::concatcp!("http://", FLINT_API_HOSTNAME, ":", FLINT_API_PORT, "/api/snaptrade");
