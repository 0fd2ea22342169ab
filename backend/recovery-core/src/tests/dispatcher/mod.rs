// Unit tests for the recovery dispatcher and retry handles
// Portal access is stubbed; timers run on tokio's paused clock

mod dispatch;

use crate::dispatcher::{PortalPresenter, Viewport};
use crate::error::PortalError;
use crate::portal::{PortalRequest, PortalUrlSource};

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use url::Url;

pub(super) const PORTAL_URL: &str = "https://app.snaptrade.com/connect?token=abc";

/// Portal source that returns a canned result and records requests.
pub(super) struct StubSource {
    fail_with: Mutex<Option<PortalError>>,
    gate: Option<Notify>,
    pub(super) requests: Mutex<Vec<PortalRequest>>,
    pub(super) calls: AtomicUsize,
}

impl StubSource {
    pub(super) fn ok() -> Self {
        Self {
            fail_with: Mutex::new(None),
            gate: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing(error: PortalError) -> Self {
        Self {
            fail_with: Mutex::new(Some(error)),
            ..Self::ok()
        }
    }

    /// Blocks each request until `release` is called.
    pub(super) fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::ok()
        }
    }

    pub(super) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl PortalUrlSource for StubSource {
    async fn portal_url(&self, request: &PortalRequest) -> Result<Url, PortalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(error) = self.fail_with.lock().unwrap().take() {
            return Err(error);
        }
        Ok(Url::parse(PORTAL_URL).unwrap())
    }
}

/// Presenter that records what it was asked to open.
#[derive(Default)]
pub(super) struct RecordingPresenter {
    pub(super) fail: bool,
    pub(super) opened: Mutex<Vec<(Url, Viewport)>>,
}

impl PortalPresenter for RecordingPresenter {
    fn present(&self, url: &Url, viewport: Viewport) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::other("no browser available"));
        }
        self.opened.lock().unwrap().push((url.clone(), viewport));
        Ok(())
    }
}
