//! Reconnect/registration portal URLs from the Flint API.
//!
//! `POST {base_url}/portal-url` with an optional `{ "reconnect": "<id>" }`
//! body answers `{ "portalUrl": "<url>" }`.

use crate::config::PortalSettings;
use crate::error::portal::PortalError;
use crate::retry::{BackoffRetrier, Jitter, RandomJitter};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const PORTAL_URL_ENDPOINT: &str = "portal-url";

/// Body of a portal URL request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortalRequest {
    /// Account to reconnect; omitted for registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconnect: Option<String>,
}

impl PortalRequest {
    pub fn register() -> Self {
        Self { reconnect: None }
    }

    pub fn reconnect(account_id: impl Into<String>) -> Self {
        Self {
            reconnect: Some(account_id.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalUrlResponse {
    portal_url: Option<String>,
}

/// Anything that can hand out a portal URL.
#[async_trait]
pub trait PortalUrlSource: Send + Sync {
    async fn portal_url(&self, request: &PortalRequest) -> Result<Url, PortalError>;
}

#[async_trait]
impl<T: PortalUrlSource + ?Sized> PortalUrlSource for Arc<T> {
    async fn portal_url(&self, request: &PortalRequest) -> Result<Url, PortalError> {
        (**self).portal_url(request).await
    }
}

#[derive(Clone)]
pub struct PortalClient {
    base_url: Url,
    client: Client,
}

impl PortalClient {
    pub fn new(base_url_str: &str, timeout: Duration) -> Result<Self, PortalError> {
        let mut base_url = Url::parse(base_url_str)?;

        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn from_settings(settings: &PortalSettings) -> Result<Self, PortalError> {
        Self::new(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request a portal URL.
    ///
    /// # Errors
    /// - [`PortalError::Http`] when the request cannot be sent or times out
    /// - [`PortalError::Api`] for non-2xx responses
    /// - [`PortalError::Json`]/[`PortalError::MissingUrl`]/[`PortalError::UrlParse`]
    ///   when the success body is unusable
    pub async fn fetch_portal_url(&self, request: &PortalRequest) -> Result<Url, PortalError> {
        let url = self.base_url.join(PORTAL_URL_ENDPOINT)?;

        debug!(
            "Requesting portal URL from {url} (reconnect: {:?})",
            request.reconnect
        );

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PortalError::from_error_body(status.as_u16(), &body));
        }

        let parsed: PortalUrlResponse = serde_json::from_str(&body)?;
        let portal_url = parsed
            .portal_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(PortalError::missing_url)?;

        let portal_url = Url::parse(portal_url.trim())?;
        info!("Obtained portal URL for host {:?}", portal_url.host_str());

        Ok(portal_url)
    }
}

#[async_trait]
impl PortalUrlSource for PortalClient {
    async fn portal_url(&self, request: &PortalRequest) -> Result<Url, PortalError> {
        self.fetch_portal_url(request).await
    }
}

/// Wraps a source so rate-limited portal requests are retried with backoff.
pub struct RetryingPortalSource<S, J: Jitter = RandomJitter> {
    inner: S,
    retrier: BackoffRetrier<J>,
}

impl<S: PortalUrlSource, J: Jitter> RetryingPortalSource<S, J> {
    pub fn new(inner: S, retrier: BackoffRetrier<J>) -> Self {
        Self { inner, retrier }
    }
}

#[async_trait]
impl<S: PortalUrlSource, J: Jitter> PortalUrlSource for RetryingPortalSource<S, J> {
    async fn portal_url(&self, request: &PortalRequest) -> Result<Url, PortalError> {
        self.retrier
            .retry(|| self.inner.portal_url(request))
            .await
    }
}
