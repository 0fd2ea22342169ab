use crate::portal_tests::helpers::{PORTAL_PATH, PORTAL_URL, client_for, error_body};

use recovery_core::error::PortalError;
use recovery_core::events::{MemoryEventSink, RecoveryEvent};
use recovery_core::portal::{PortalRequest, PortalUrlSource, RetryingPortalSource};
use recovery_core::retry::{BackoffRetrier, FixedJitter, RetryPolicy};

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retrier(max_attempts: u32) -> BackoffRetrier<FixedJitter> {
    BackoffRetrier::with_jitter(
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(10),
            max_jitter: Duration::ZERO,
        },
        FixedJitter(Duration::ZERO),
    )
}

/// **VALUE**: A throttled portal call succeeds transparently once the API recovers.
///
/// **BUG THIS CATCHES**: Would catch the retrier giving up on the first 429 or not re-issuing
/// the request.
#[tokio::test]
async fn given_two_rate_limits_then_success_when_retried_then_returns_url() {
    // GIVEN: Two 429s, then a portal URL
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body("RATE_LIMITED", "slow")))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "portalUrl": PORTAL_URL })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let events = Arc::new(MemoryEventSink::new());
    let retrier = fast_retrier(3).with_events(events.clone());

    // WHEN
    let request = PortalRequest::register();
    let url = retrier
        .retry(|| client.fetch_portal_url(&request))
        .await
        .expect("third attempt should succeed");

    // THEN
    assert_eq!(url.as_str(), PORTAL_URL);
    assert_eq!(
        events.events(),
        vec![
            RecoveryEvent::BackoffAttempt {
                attempt: 1,
                delay_ms: 10
            },
            RecoveryEvent::BackoffAttempt {
                attempt: 2,
                delay_ms: 20
            },
        ]
    );
}

#[tokio::test]
async fn given_persistent_rate_limit_when_retried_then_last_error_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let request = PortalRequest::register();

    let err = fast_retrier(2)
        .retry(|| client.fetch_portal_url(&request))
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::Api { .. }));
}

#[tokio::test]
async fn given_auth_failure_when_retried_then_single_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body("SIGNATURE_INVALID", "expired")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let request = PortalRequest::register();

    let result = fast_retrier(3)
        .retry(|| client.fetch_portal_url(&request))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn given_retrying_source_when_rate_limited_once_then_url_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "portalUrl": PORTAL_URL })))
        .mount(&server)
        .await;
    let source = RetryingPortalSource::new(client_for(&server), fast_retrier(3));

    let url = source
        .portal_url(&PortalRequest::reconnect("auth-9"))
        .await
        .expect("second attempt should succeed");

    assert_eq!(url.as_str(), PORTAL_URL);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
