//! Test helpers for portal integration tests.
//!
//! - Starting a mock Flint API
//! - Building a client against it
//! - Recording presenter standing in for the browser

use recovery_core::dispatcher::{PortalPresenter, Viewport};
use recovery_core::portal::PortalClient;

use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/api/snaptrade";
pub const PORTAL_PATH: &str = "/api/snaptrade/portal-url";
pub const PORTAL_URL: &str = "https://connect.snaptrade.com/portal?session=test";

/// Test helper: Client pointed at the mock server's API prefix.
pub fn client_for(server: &MockServer) -> PortalClient {
    PortalClient::new(
        &format!("{}{API_PREFIX}", server.uri()),
        Duration::from_secs(5),
    )
    .expect("Failed to build portal client")
}

/// Test helper: Mount a successful portal response.
pub async fn mount_portal_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "portalUrl": PORTAL_URL })))
        .mount(server)
        .await;
}

/// Test helper: Structured provider error body.
pub fn error_body(code: &str, message: &str) -> serde_json::Value {
    json!({ "error": { "code": code, "message": message } })
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub opened: Mutex<Vec<Url>>,
}

impl PortalPresenter for RecordingPresenter {
    fn present(&self, url: &Url, _viewport: Viewport) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }
}
