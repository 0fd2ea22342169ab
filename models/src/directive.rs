//! Recovery directives: what the caller should offer after a failure.
//!
//! Internally a directive holds exactly one [`RecoveryAction`]. On the wire
//! it keeps the flat boolean shape the presentation layer consumes:
//!
//! ```json
//! { "shouldRetry": true, "shouldReconnect": false, "shouldRegister": false,
//!   "userMessage": "...", "retryDelayMs": 5000 }
//! ```
//!
//! Decoding rejects payloads with zero or several flags set, so the
//! multi-action states cannot be built from either side.

use crate::{ErrorLocation, ModelError};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The single action a directive asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryAction {
    /// Call the operation again, optionally after a delay.
    Retry { delay: Option<Duration> },
    /// Send the user through the provider's reconnect portal.
    Reconnect,
    /// Send the user through the provider's registration flow.
    Register,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DirectiveWire", try_from = "DirectiveWire")]
pub struct RecoveryDirective {
    action: RecoveryAction,
    user_message: String,
}

impl RecoveryDirective {
    pub fn new(action: RecoveryAction, user_message: impl Into<String>) -> Self {
        Self {
            action,
            user_message: user_message.into(),
        }
    }

    pub fn retry(delay: Option<Duration>, user_message: impl Into<String>) -> Self {
        Self::new(RecoveryAction::Retry { delay }, user_message)
    }

    pub fn reconnect(user_message: impl Into<String>) -> Self {
        Self::new(RecoveryAction::Reconnect, user_message)
    }

    pub fn register(user_message: impl Into<String>) -> Self {
        Self::new(RecoveryAction::Register, user_message)
    }

    pub fn action(&self) -> RecoveryAction {
        self.action
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn should_retry(&self) -> bool {
        matches!(self.action, RecoveryAction::Retry { .. })
    }

    pub fn should_reconnect(&self) -> bool {
        self.action == RecoveryAction::Reconnect
    }

    pub fn should_register(&self) -> bool {
        self.action == RecoveryAction::Register
    }

    /// Delay before retrying; `None` for immediate retries and portal actions.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self.action {
            RecoveryAction::Retry { delay } => delay,
            RecoveryAction::Reconnect | RecoveryAction::Register => None,
        }
    }

    pub fn retry_delay_ms(&self) -> Option<u64> {
        self.retry_delay()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// True when acting on the directive needs a portal URL.
    pub fn needs_portal(&self) -> bool {
        matches!(
            self.action,
            RecoveryAction::Reconnect | RecoveryAction::Register
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectiveWire {
    #[serde(default)]
    should_retry: bool,
    #[serde(default)]
    should_reconnect: bool,
    #[serde(default)]
    should_register: bool,
    #[serde(default)]
    user_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retry_delay_ms: Option<u64>,
}

impl From<RecoveryDirective> for DirectiveWire {
    fn from(directive: RecoveryDirective) -> Self {
        let retry_delay_ms = directive.retry_delay_ms();
        DirectiveWire {
            should_retry: directive.should_retry(),
            should_reconnect: directive.should_reconnect(),
            should_register: directive.should_register(),
            user_message: directive.user_message,
            retry_delay_ms,
        }
    }
}

impl TryFrom<DirectiveWire> for RecoveryDirective {
    type Error = ModelError;

    #[track_caller]
    fn try_from(wire: DirectiveWire) -> Result<Self, Self::Error> {
        let action = match (wire.should_retry, wire.should_reconnect, wire.should_register) {
            (true, false, false) => RecoveryAction::Retry {
                delay: wire.retry_delay_ms.map(Duration::from_millis),
            },
            (false, true, false) => RecoveryAction::Reconnect,
            (false, false, true) => RecoveryAction::Register,
            (retry, reconnect, register) => {
                return Err(ModelError::Validation {
                    message: format!(
                        "Directive must set exactly one action flag \
                         (shouldRetry={retry}, shouldReconnect={reconnect}, shouldRegister={register})"
                    ),
                    location: ErrorLocation::caller(),
                });
            }
        };

        if !matches!(action, RecoveryAction::Retry { .. }) && wire.retry_delay_ms.is_some() {
            return Err(ModelError::Validation {
                message: String::from("retryDelayMs is only valid when shouldRetry is set"),
                location: ErrorLocation::caller(),
            });
        }

        Ok(RecoveryDirective {
            action,
            user_message: wire.user_message,
        })
    }
}
