//! Owned handle for a delayed retry.

use crate::events::{EventSink, RecoveryEvent};

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use log::debug;
use tokio::spawn as TokioSpawn;
use tokio::task::JoinHandle;
use tokio::time::sleep as TokioSleep;
use uuid::Uuid;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// A retry callback waiting on a single-shot timer.
///
/// Whoever owns the dispatching UI context owns this handle. Calling
/// [`RetryHandle::cancel`] or dropping the handle before the timer elapses
/// guarantees the callback never runs. The callback and a cancellation race
/// on one atomic state, so exactly one of them wins.
pub struct RetryHandle {
    dispatch_id: Uuid,
    delay: Duration,
    state: Arc<AtomicU8>,
    task: Option<JoinHandle<()>>,
    events: Arc<dyn EventSink>,
}

impl RetryHandle {
    pub(crate) fn schedule<F>(
        dispatch_id: Uuid,
        delay: Duration,
        on_retry: F,
        events: Arc<dyn EventSink>,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        // Recorded before spawning so it always precedes RetryFired.
        events.record(RecoveryEvent::RetryScheduled {
            dispatch_id,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        });

        let state = Arc::new(AtomicU8::new(PENDING));
        let task_state = Arc::clone(&state);
        let task_events = Arc::clone(&events);

        let task = TokioSpawn(async move {
            TokioSleep(delay).await;

            if task_state
                .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                debug!("Delayed retry {dispatch_id} firing after {delay:?}");
                task_events.record(RecoveryEvent::RetryFired { dispatch_id });
                on_retry();
            }
        });

        Self {
            dispatch_id,
            delay,
            state,
            task: Some(task),
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True once the callback has been invoked.
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Cancel the retry.
    ///
    /// Returns `true` if this call prevented the callback, `false` if it had
    /// already fired.
    pub fn cancel(mut self) -> bool {
        self.cancel_inner()
    }

    /// Wait for the timer. Returns `true` if the callback ran.
    pub async fn wait(mut self) -> bool {
        if let Some(task) = self.task.as_mut() {
            let _ = task.await;
        }
        self.task = None;
        self.has_fired()
    }

    fn cancel_inner(&mut self) -> bool {
        let prevented = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if let Some(task) = self.task.take() {
            task.abort();
        }

        if prevented {
            debug!("Delayed retry {} cancelled", self.dispatch_id);
            self.events.record(RecoveryEvent::RetryCancelled {
                dispatch_id: self.dispatch_id,
            });
        }

        prevented
    }
}

impl Drop for RetryHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel_inner();
        }
    }
}

impl std::fmt::Debug for RetryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryHandle")
            .field("dispatch_id", &self.dispatch_id)
            .field("delay", &self.delay)
            .field("state", &self.state.load(Ordering::Acquire))
            .finish()
    }
}
