use crate::portal_tests::helpers::{
    PORTAL_PATH, PORTAL_URL, RecordingPresenter, client_for, error_body, mount_portal_ok,
};

use recovery_core::events::{MemoryEventSink, RecoveryEvent};
use recovery_core::{ApiFailure, DispatchContext, DispatchOutcome, RecoveryDispatcher};

use models::{ErrorCode, ErrorResponse};

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: End to end: an expired signature leads to a reconnect portal being opened.
///
/// **WHY THIS MATTERS**: This is the path a user takes when their brokerage session lapses.
/// Each step (classification, portal request, presentation) is covered separately; this
/// proves they compose.
#[tokio::test]
async fn given_signature_invalid_when_recovered_then_reconnect_portal_presented() {
    // GIVEN
    let server = MockServer::start().await;
    mount_portal_ok(&server).await;
    let presenter = Arc::new(RecordingPresenter::default());
    let events = Arc::new(MemoryEventSink::new());
    let dispatcher = RecoveryDispatcher::new(client_for(&server), presenter.clone())
        .with_events(events.clone());
    let failure = ApiFailure::Api(ErrorResponse::new(ErrorCode::SignatureInvalid, "expired"));

    // WHEN
    let (directive, outcome) = dispatcher
        .recover(&failure, DispatchContext::new(|| {}).reconnecting("auth-3"))
        .await
        .expect("recovery should succeed");

    // THEN
    assert!(directive.should_reconnect());
    assert!(matches!(outcome, DispatchOutcome::PortalOpened { .. }));
    assert_eq!(presenter.opened.lock().unwrap()[0].as_str(), PORTAL_URL);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["reconnect"], "auth-3");

    assert!(matches!(
        events.events().as_slice(),
        [RecoveryEvent::Classified { .. }, RecoveryEvent::PortalOpened { .. }]
    ));
}

#[tokio::test]
async fn given_portal_endpoint_rate_limited_when_dispatched_then_secondary_retry_directive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body("RATE_LIMITED", "")))
        .mount(&server)
        .await;
    let presenter = Arc::new(RecordingPresenter::default());
    let dispatcher = RecoveryDispatcher::new(client_for(&server), presenter.clone());
    let failure = ApiFailure::Api(ErrorResponse::new(ErrorCode::SnaptradeNotRegistered, ""));

    let err = dispatcher
        .recover(&failure, DispatchContext::new(|| {}))
        .await
        .unwrap_err();

    let secondary = err.directive().unwrap();
    assert!(secondary.should_retry());
    assert_eq!(secondary.retry_delay_ms(), Some(5000));
    assert!(presenter.opened.lock().unwrap().is_empty());
}
