//! Recovery events for diagnostics and analytics.
//!
//! The engine reports what it did through an [`EventSink`]. Shipping events
//! anywhere beyond the log is left to the embedding application.

use crate::failure::ApiFailure;

use models::{ErrorCode, RecoveryDirective};

use std::sync::{Mutex, PoisonError};

use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecoveryEvent {
    Classified {
        /// `None` for transport failures.
        code: Option<ErrorCode>,
        should_retry: bool,
        should_reconnect: bool,
        should_register: bool,
    },
    PortalOpened {
        dispatch_id: Uuid,
        reconnect: Option<String>,
    },
    PortalFailed {
        dispatch_id: Uuid,
        reason: String,
    },
    RetryScheduled {
        dispatch_id: Uuid,
        delay_ms: u64,
    },
    RetryFired {
        dispatch_id: Uuid,
    },
    RetryCancelled {
        dispatch_id: Uuid,
    },
    BackoffAttempt {
        attempt: u32,
        delay_ms: u64,
    },
}

impl RecoveryEvent {
    pub fn classified(failure: &ApiFailure, directive: &RecoveryDirective) -> Self {
        RecoveryEvent::Classified {
            code: failure.response().map(|r| r.code()),
            should_retry: directive.should_retry(),
            should_reconnect: directive.should_reconnect(),
            should_register: directive.should_register(),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: RecoveryEvent);
}

/// Writes each event to the log as a single JSON line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn record(&self, event: RecoveryEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => info!("Recovery event: {json}"),
            Err(e) => warn!("Failed to serialize recovery event {event:?}: {e}"),
        }
    }
}

/// Keeps events in memory; used by tests and by callers that batch events.
///
/// A panic elsewhere while the lock is held does not lose recorded events.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    pub(crate) events: Mutex<Vec<RecoveryEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<RecoveryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn drain(&self) -> Vec<RecoveryEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: RecoveryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
