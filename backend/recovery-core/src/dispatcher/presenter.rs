//! Opening portal URLs in a separate browsing context.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use url::Url;

/// Fixed size for the portal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 500,
            height: 700,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub trait PortalPresenter: Send + Sync {
    fn present(&self, url: &Url, viewport: Viewport) -> std::io::Result<()>;
}

impl<T: PortalPresenter + ?Sized> PortalPresenter for Arc<T> {
    fn present(&self, url: &Url, viewport: Viewport) -> std::io::Result<()> {
        (**self).present(url, viewport)
    }
}

/// Hands the URL to the operating system's default browser.
///
/// The system browser picks its own window size, so the viewport is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowserPresenter;

impl PortalPresenter for SystemBrowserPresenter {
    fn present(&self, url: &Url, viewport: Viewport) -> std::io::Result<()> {
        debug!("Requested portal viewport {viewport} is not applied by the system browser");
        open::that(url.as_str())?;
        info!("Opened portal in system browser");
        Ok(())
    }
}
