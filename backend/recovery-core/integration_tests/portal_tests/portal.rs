use crate::portal_tests::helpers::{
    PORTAL_PATH, PORTAL_URL, client_for, error_body, mount_portal_ok,
};

use recovery_core::error::PortalError;
use recovery_core::portal::{PortalClient, PortalRequest};
use recovery_core::{RateLimitSignal, classify};

use common::HttpStatusCode;
use models::ErrorCode;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies the client posts to `portal-url` under the configured prefix and
/// returns the parsed URL.
///
/// **BUG THIS CATCHES**: Would catch `Url::join` dropping the `/api/snaptrade` segment
/// because the base URL lacked a trailing slash.
#[tokio::test]
async fn given_api_returns_portal_url_when_fetched_then_url_parsed() {
    // GIVEN: Mock API with a portal endpoint
    let server = MockServer::start().await;
    mount_portal_ok(&server).await;
    let client = client_for(&server);

    // WHEN
    let url = client
        .fetch_portal_url(&PortalRequest::register())
        .await
        .expect("portal fetch should succeed");

    // THEN
    assert_eq!(url.as_str(), PORTAL_URL);
    assert!(client.base_url().path().ends_with('/'));
}

#[tokio::test]
async fn given_reconnect_request_when_fetched_then_body_carries_account_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .and(body_json(json!({ "reconnect": "auth-7" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "portalUrl": PORTAL_URL })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_portal_url(&PortalRequest::reconnect("auth-7"))
        .await;

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn given_register_request_when_fetched_then_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "portalUrl": PORTAL_URL })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_portal_url(&PortalRequest::register())
        .await;

    assert!(result.is_ok(), "{result:?}");
}

/// **VALUE**: Structured provider errors from the portal endpoint keep their code.
///
/// **WHY THIS MATTERS**: The portal endpoint itself can report `SNAPTRADE_NOT_REGISTERED`;
/// the dispatcher classifies that failure to tell the user what to do next.
#[tokio::test]
async fn given_api_returns_error_body_when_fetched_then_api_error_with_code() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(error_body("SNAPTRADE_NOT_REGISTERED", "Not registered")),
        )
        .mount(&server)
        .await;

    // WHEN
    let err = client_for(&server)
        .fetch_portal_url(&PortalRequest::register())
        .await
        .unwrap_err();

    // THEN
    let PortalError::Api { response, .. } = &err else {
        panic!("expected Api error, got {err:?}");
    };
    assert_eq!(response.code(), ErrorCode::SnaptradeNotRegistered);
    assert_eq!(response.http_status, Some(HttpStatusCode(403)));
    assert!(classify(&err.failure()).should_register());
}

#[tokio::test]
async fn given_bare_429_when_fetched_then_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_portal_url(&PortalRequest::register())
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.status_code(), Some(HttpStatusCode(429)));
}

#[tokio::test]
async fn given_success_without_portal_url_when_fetched_then_missing_url() {
    for body in [json!({}), json!({ "portalUrl": "  " })] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PORTAL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_portal_url(&PortalRequest::register())
            .await
            .unwrap_err();

        assert!(matches!(err, PortalError::MissingUrl { .. }), "{err}");
    }
}

#[tokio::test]
async fn given_success_with_non_json_body_when_fetched_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_portal_url(&PortalRequest::register())
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::Json { .. }), "{err}");
}

/// **VALUE**: A dead API surfaces as a transport failure, classified as a network retry.
///
/// **BUG THIS CATCHES**: Would catch connection failures being mapped to `UNKNOWN`,
/// which shows the wrong message.
#[tokio::test]
async fn given_api_unreachable_when_fetched_then_network_failure() {
    // GIVEN: A port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api/snaptrade", listener.local_addr().unwrap());
    drop(listener);
    let client = PortalClient::new(&base, Duration::from_secs(2)).unwrap();

    // WHEN
    let err = client
        .fetch_portal_url(&PortalRequest::register())
        .await
        .unwrap_err();

    // THEN
    assert!(matches!(err, PortalError::Http { .. }), "{err}");
    assert!(err.failure().is_network());
}

#[test]
fn given_invalid_base_url_when_client_built_then_url_parse_error() {
    let result = PortalClient::new("not a url", Duration::from_secs(1));

    assert!(matches!(result, Err(PortalError::UrlParse { .. })));
}
