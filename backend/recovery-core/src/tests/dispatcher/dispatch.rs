use super::{PORTAL_URL, RecordingPresenter, StubSource};

use crate::dispatcher::{DispatchContext, DispatchOutcome, RecoveryDispatcher, Viewport};
use crate::error::{DispatchError, PortalError};
use crate::events::{MemoryEventSink, RecoveryEvent};
use crate::failure::ApiFailure;
use crate::portal::PortalRequest;

use models::{ErrorCode, ErrorResponse, RecoveryDirective};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

fn dispatcher(
    source: StubSource,
    presenter: RecordingPresenter,
) -> (
    RecoveryDispatcher<Arc<StubSource>, Arc<RecordingPresenter>>,
    Arc<StubSource>,
    Arc<RecordingPresenter>,
    Arc<MemoryEventSink>,
) {
    let source = Arc::new(source);
    let presenter = Arc::new(presenter);
    let events = Arc::new(MemoryEventSink::new());
    let dispatcher = RecoveryDispatcher::new(source.clone(), presenter.clone())
        .with_events(events.clone());
    (dispatcher, source, presenter, events)
}

fn noop() -> DispatchContext<impl FnOnce() + Send + 'static> {
    DispatchContext::new(|| {})
}

#[tokio::test]
async fn given_immediate_retry_when_dispatched_then_callback_invoked_now() {
    // GIVEN
    let (dispatcher, source, _, _) = dispatcher(StubSource::ok(), RecordingPresenter::default());
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();

    // WHEN
    let outcome = dispatcher
        .dispatch(
            &RecoveryDirective::retry(None, "again"),
            DispatchContext::new(move || flag.store(true, Ordering::SeqCst)),
        )
        .await
        .unwrap();

    // THEN
    assert!(matches!(outcome, DispatchOutcome::Retried));
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "no portal request");
}

#[tokio::test(start_paused = true)]
async fn given_delayed_retry_when_dispatched_then_callback_fires_after_delay() {
    // GIVEN
    let (dispatcher, _, _, events) = dispatcher(StubSource::ok(), RecordingPresenter::default());
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();
    let start = tokio::time::Instant::now();

    // WHEN
    let outcome = dispatcher
        .dispatch(
            &RecoveryDirective::retry(Some(Duration::from_millis(5000)), "rate limited"),
            DispatchContext::new(move || flag.store(true, Ordering::SeqCst)),
        )
        .await
        .unwrap();

    // THEN: Nothing yet, then fires once the timer elapses
    let handle = match outcome {
        DispatchOutcome::RetryScheduled(handle) => handle,
        other => panic!("expected a scheduled retry, got {other:?}"),
    };
    assert!(!called.load(Ordering::SeqCst));
    let id = handle.id();

    assert!(handle.wait().await, "callback should have run");
    assert!(called.load(Ordering::SeqCst));
    assert!(start.elapsed() >= Duration::from_millis(5000));
    assert_eq!(
        events.events(),
        vec![
            RecoveryEvent::RetryScheduled {
                dispatch_id: id,
                delay_ms: 5000
            },
            RecoveryEvent::RetryFired { dispatch_id: id },
        ]
    );
}

#[tokio::test]
async fn given_zero_delay_retry_when_dispatched_then_treated_as_immediate() {
    let (dispatcher, _, _, _) = dispatcher(StubSource::ok(), RecordingPresenter::default());

    let outcome = dispatcher
        .dispatch(&RecoveryDirective::retry(Some(Duration::ZERO), "now"), noop())
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Retried));
}

/// **VALUE**: A reconnect directive fetches a portal for the given account and presents it
/// with the configured viewport.
#[tokio::test]
async fn given_reconnect_with_account_when_dispatched_then_portal_opened_for_account() {
    // GIVEN
    let (dispatcher, source, presenter, events) =
        dispatcher(StubSource::ok(), RecordingPresenter::default());
    let dispatcher = dispatcher.with_viewport(Viewport {
        width: 480,
        height: 640,
    });

    // WHEN
    let outcome = dispatcher
        .dispatch(
            &RecoveryDirective::reconnect("Authentication expired"),
            noop().reconnecting("auth-42"),
        )
        .await
        .unwrap();

    // THEN
    let DispatchOutcome::PortalOpened { url } = &outcome else {
        panic!("expected portal, got {outcome:?}");
    };
    assert_eq!(url.as_str(), PORTAL_URL);
    assert_eq!(
        source.requests.lock().unwrap().as_slice(),
        &[PortalRequest::reconnect("auth-42")]
    );
    let opened = presenter.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].1, Viewport { width: 480, height: 640 });
    assert!(matches!(
        events.events().as_slice(),
        [RecoveryEvent::PortalOpened { reconnect: Some(id), .. }] if id == "auth-42"
    ));
    assert!(!dispatcher.portal_pending(), "guard released after success");
}

#[tokio::test]
async fn given_register_when_dispatched_then_portal_requested_without_reconnect() {
    let (dispatcher, source, _, _) = dispatcher(StubSource::ok(), RecordingPresenter::default());

    // Account id is ignored for registration.
    dispatcher
        .dispatch(
            &RecoveryDirective::register("Please register"),
            noop().reconnecting("auth-1"),
        )
        .await
        .unwrap();

    assert_eq!(
        source.requests.lock().unwrap().as_slice(),
        &[PortalRequest::register()]
    );
}

/// **VALUE**: Concurrent portal triggers are coalesced into one request.
///
/// **WHY THIS MATTERS**: Double-clicking "Reconnect" must not create two provider sessions;
/// the second trigger sees the pending state the UI uses to disable the control.
///
/// **BUG THIS CATCHES**: Would catch the in-flight guard being removed or released early.
#[tokio::test]
async fn given_portal_request_in_flight_when_dispatched_again_then_returns_pending() {
    // GIVEN: A source that blocks until released
    let (dispatcher, source, _, _) =
        dispatcher(StubSource::gated(), RecordingPresenter::default());
    let directive = RecoveryDirective::reconnect("reconnect");

    // WHEN: Two dispatches race; the first is released after the second has run
    let (first, second, _) = tokio::join!(
        dispatcher.dispatch(&directive, noop()),
        dispatcher.dispatch(&directive, noop()),
        async {
            tokio::task::yield_now().await;
            source.release();
        }
    );

    // THEN
    assert!(matches!(first.unwrap(), DispatchOutcome::PortalOpened { .. }));
    assert!(matches!(second.unwrap(), DispatchOutcome::PortalPending));
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(!dispatcher.portal_pending());
}

/// **VALUE**: A failed portal fetch surfaces as an error carrying its own directive.
///
/// **BUG THIS CATCHES**: Would catch the failure being logged and swallowed, leaving the
/// user on a dead "Reconnect" button with no feedback.
#[tokio::test]
async fn given_portal_fetch_fails_when_dispatched_then_error_carries_secondary_directive() {
    // GIVEN: The portal endpoint itself is rate limited
    let failure = PortalError::from_error_body(
        429,
        r#"{"error":{"code":"RATE_LIMITED","message":"slow down"}}"#,
    );
    let (dispatcher, _, presenter, events) =
        dispatcher(StubSource::failing(failure), RecordingPresenter::default());

    // WHEN
    let result = dispatcher
        .dispatch(&RecoveryDirective::register("register"), noop())
        .await;

    // THEN
    let err = result.unwrap_err();
    let directive = err.directive().expect("portal failures are classified");
    assert!(directive.should_retry());
    assert_eq!(directive.retry_delay_ms(), Some(5000));
    assert!(matches!(err, DispatchError::Portal { .. }));
    assert!(presenter.opened.lock().unwrap().is_empty());
    assert!(matches!(
        events.events().as_slice(),
        [RecoveryEvent::PortalFailed { .. }]
    ));
    assert!(!dispatcher.portal_pending(), "guard released after failure");
}

#[tokio::test]
async fn given_presenter_fails_when_dispatched_then_present_error_returned() {
    let presenter = RecordingPresenter {
        fail: true,
        ..RecordingPresenter::default()
    };
    let (dispatcher, _, _, _) = dispatcher(StubSource::ok(), presenter);

    let result = dispatcher
        .dispatch(&RecoveryDirective::reconnect("reconnect"), noop())
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DispatchError::Present { .. }));
    assert!(err.directive().is_none());
    assert!(err.to_string().contains("no browser available"));
}

#[tokio::test]
async fn given_failure_when_recovered_then_classifies_records_and_dispatches() {
    // GIVEN
    let (dispatcher, _, _, events) = dispatcher(StubSource::ok(), RecordingPresenter::default());
    let retries = Arc::new(AtomicUsize::new(0));
    let counter = retries.clone();
    let failure = ApiFailure::Api(ErrorResponse::new(ErrorCode::SnaptradeUserMismatch, "who?"));

    // WHEN
    let (directive, outcome) = dispatcher
        .recover(
            &failure,
            DispatchContext::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await
        .unwrap();

    // THEN
    assert!(directive.should_register());
    assert!(matches!(outcome, DispatchOutcome::PortalOpened { .. }));
    assert_eq!(retries.load(Ordering::SeqCst), 0);
    assert_eq!(
        events.events().first(),
        Some(&RecoveryEvent::Classified {
            code: Some(ErrorCode::SnaptradeUserMismatch),
            should_retry: false,
            should_reconnect: false,
            should_register: true,
        })
    );
}
