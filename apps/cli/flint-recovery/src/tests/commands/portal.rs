use crate::commands::portal::open_portal;
use crate::error::FlintError;

use common::HttpStatusCode;
use models::{ErrorCode, ErrorResponse};
use recovery_core::RecoveryDispatcher;
use recovery_core::dispatcher::{PortalPresenter, Viewport};
use recovery_core::error::PortalError;
use recovery_core::portal::{PortalRequest, PortalUrlSource};

use async_trait::async_trait;
use url::Url;

struct FixedSource {
    response: Option<ErrorResponse>,
}

#[async_trait]
impl PortalUrlSource for FixedSource {
    async fn portal_url(&self, _request: &PortalRequest) -> Result<Url, PortalError> {
        match &self.response {
            None => Ok(Url::parse("https://portal.example.com/s/1").unwrap()),
            Some(response) => Err(PortalError::Api {
                response: response.clone(),
                location: common::ErrorLocation::caller(),
            }),
        }
    }
}

struct NoopPresenter;

impl PortalPresenter for NoopPresenter {
    fn present(&self, _url: &Url, _viewport: Viewport) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn given_reconnect_id_when_portal_opened_then_reconnect_requested() {
    let source = FixedSource {
        response: None,
    };
    let dispatcher = RecoveryDispatcher::new(source, NoopPresenter);

    let url = open_portal(&dispatcher, Some(String::from("auth-5")))
        .await
        .unwrap();

    assert_eq!(url.host_str(), Some("portal.example.com"));
}

/// **VALUE**: A failing portal request is reported with the directive for that failure.
///
/// **BUG THIS CATCHES**: Would catch the secondary directive being dropped in favour of a
/// bare error string.
#[tokio::test]
async fn given_portal_rejected_when_opened_then_recovery_error_with_directive() {
    // GIVEN: The API says the user is not registered
    let source = FixedSource {
        response: Some(
            ErrorResponse::new(ErrorCode::SnaptradeNotRegistered, "no user")
                .with_http_status(HttpStatusCode(403)),
        ),
    };
    let dispatcher = RecoveryDispatcher::new(source, NoopPresenter);

    // WHEN
    let err = open_portal(&dispatcher, None).await.unwrap_err();

    // THEN
    let FlintError::Recovery { directive, .. } = &err else {
        panic!("expected Recovery error, got {err:?}");
    };
    assert!(directive.should_register());
}
