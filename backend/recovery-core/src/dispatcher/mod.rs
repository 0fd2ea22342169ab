//! Carries out recovery directives.
//!
//! - Register/Reconnect: fetch a portal URL and present it
//! - Retry without delay: invoke the callback now
//! - Retry with delay: schedule the callback and hand back a [`RetryHandle`]
//!
//! One portal request may be in flight per dispatcher. A second trigger
//! while one is outstanding gets [`DispatchOutcome::PortalPending`] and no
//! request is sent.

pub mod handle;
pub mod presenter;

pub use handle::RetryHandle;
pub use presenter::{PortalPresenter, SystemBrowserPresenter, Viewport};

use crate::classifier::classify;
use crate::config::PortalSettings;
use crate::error::dispatch::DispatchError;
use crate::events::{EventSink, LogEventSink, RecoveryEvent};
use crate::failure::ApiFailure;
use crate::portal::{PortalRequest, PortalUrlSource};

use common::ErrorLocation;
use models::{RecoveryAction, RecoveryDirective};

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Per-dispatch inputs supplied by the caller.
pub struct DispatchContext<F> {
    reconnect: Option<String>,
    on_retry: F,
}

impl<F> DispatchContext<F>
where
    F: FnOnce() + Send + 'static,
{
    pub fn new(on_retry: F) -> Self {
        Self {
            reconnect: None,
            on_retry,
        }
    }

    /// Account to reconnect when the directive asks for a reconnect portal.
    pub fn reconnecting(mut self, account_id: impl Into<String>) -> Self {
        self.reconnect = Some(account_id.into());
        self
    }
}

#[derive(Debug)]
pub enum DispatchOutcome {
    PortalOpened { url: Url },
    /// Another portal request from this dispatcher is still outstanding.
    PortalPending,
    Retried,
    RetryScheduled(RetryHandle),
}

pub struct RecoveryDispatcher<S, P> {
    source: S,
    presenter: P,
    viewport: Viewport,
    portal_in_flight: AtomicBool,
    events: Arc<dyn EventSink>,
}

impl<S, P> RecoveryDispatcher<S, P>
where
    S: PortalUrlSource,
    P: PortalPresenter,
{
    pub fn new(source: S, presenter: P) -> Self {
        Self {
            source,
            presenter,
            viewport: Viewport::default(),
            portal_in_flight: AtomicBool::new(false),
            events: Arc::new(LogEventSink),
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_settings(self, settings: &PortalSettings) -> Self {
        self.with_viewport(Viewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
        })
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// True while a portal request is outstanding; the UI disables its control.
    pub fn portal_pending(&self) -> bool {
        self.portal_in_flight.load(Ordering::Acquire)
    }

    /// Classify `failure`, record it, and dispatch the resulting directive.
    pub async fn recover<F>(
        &self,
        failure: &ApiFailure,
        context: DispatchContext<F>,
    ) -> Result<(RecoveryDirective, DispatchOutcome), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let directive = classify(failure);
        self.events
            .record(RecoveryEvent::classified(failure, &directive));
        let outcome = self.dispatch(&directive, context).await?;
        Ok((directive, outcome))
    }

    pub async fn dispatch<F>(
        &self,
        directive: &RecoveryDirective,
        context: DispatchContext<F>,
    ) -> Result<DispatchOutcome, DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let dispatch_id = Uuid::new_v4();
        let DispatchContext {
            reconnect,
            on_retry,
        } = context;

        match directive.action() {
            RecoveryAction::Register => {
                self.open_portal(dispatch_id, PortalRequest::register())
                    .await
            }
            RecoveryAction::Reconnect => {
                let request = PortalRequest { reconnect };
                self.open_portal(dispatch_id, request).await
            }
            RecoveryAction::Retry { delay } => match delay.filter(|d| !d.is_zero()) {
                None => {
                    debug!("Dispatch {dispatch_id}: retrying immediately");
                    on_retry();
                    Ok(DispatchOutcome::Retried)
                }
                Some(delay) => {
                    debug!("Dispatch {dispatch_id}: retrying after {delay:?}");
                    Ok(DispatchOutcome::RetryScheduled(RetryHandle::schedule(
                        dispatch_id,
                        delay,
                        on_retry,
                        Arc::clone(&self.events),
                    )))
                }
            },
        }
    }

    async fn open_portal(
        &self,
        dispatch_id: Uuid,
        request: PortalRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(_guard) = InFlightGuard::acquire(&self.portal_in_flight) else {
            debug!("Dispatch {dispatch_id}: portal request already in flight");
            return Ok(DispatchOutcome::PortalPending);
        };

        let url = match self.source.portal_url(&request).await {
            Ok(url) => url,
            Err(source) => {
                warn!("Dispatch {dispatch_id}: failed to obtain portal URL: {source}");
                self.events.record(RecoveryEvent::PortalFailed {
                    dispatch_id,
                    reason: source.to_string(),
                });
                return Err(DispatchError::Portal {
                    directive: classify(&source.failure()),
                    location: ErrorLocation::from(Location::caller()),
                    source,
                });
            }
        };

        self.presenter
            .present(&url, self.viewport)
            .map_err(|e| DispatchError::Present {
                message: format!("Failed to open portal: {e}"),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            })?;

        info!("Dispatch {dispatch_id}: portal opened");
        self.events.record(RecoveryEvent::PortalOpened {
            dispatch_id,
            reconnect: request.reconnect,
        });

        Ok(DispatchOutcome::PortalOpened { url })
    }
}

/// Holds the in-flight flag for one portal request.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
