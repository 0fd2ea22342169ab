use crate::error::FlintError;

use common::ErrorLocation;
use models::RecoveryDirective;
use recovery_core::config::RecoveryConfig;
use recovery_core::dispatcher::{PortalPresenter, SystemBrowserPresenter};
use recovery_core::error::DispatchError;
use recovery_core::portal::{PortalClient, PortalUrlSource, RetryingPortalSource};
use recovery_core::{BackoffRetrier, DispatchContext, DispatchOutcome, RecoveryDispatcher, RetryPolicy};

use std::panic::Location;

use log::{error, info};
use url::Url;

const REGISTER_MESSAGE: &str = "Register your brokerage account to start syncing.";
const RECONNECT_MESSAGE: &str = "Reconnect your brokerage account to resume syncing.";

/// Open the portal using the configured API and the system browser.
pub async fn run(config: &RecoveryConfig, reconnect: Option<String>) -> Result<Url, FlintError> {
    let client = PortalClient::from_settings(&config.portal).map_err(|e| FlintError::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let source = RetryingPortalSource::new(
        client,
        BackoffRetrier::new(RetryPolicy::from(&config.retry)),
    );
    let dispatcher =
        RecoveryDispatcher::new(source, SystemBrowserPresenter).with_settings(&config.portal);

    open_portal(&dispatcher, reconnect).await
}

/// Dispatch a register or reconnect directive and return the opened URL.
pub async fn open_portal<S, P>(
    dispatcher: &RecoveryDispatcher<S, P>,
    reconnect: Option<String>,
) -> Result<Url, FlintError>
where
    S: PortalUrlSource,
    P: PortalPresenter,
{
    // Portal directives never invoke the retry callback.
    let context = DispatchContext::new(|| {});
    let (directive, context) = match reconnect {
        Some(account_id) => (
            RecoveryDirective::reconnect(RECONNECT_MESSAGE),
            context.reconnecting(account_id),
        ),
        None => (RecoveryDirective::register(REGISTER_MESSAGE), context),
    };

    match dispatcher.dispatch(&directive, context).await {
        Ok(DispatchOutcome::PortalOpened { url }) => {
            info!("Portal opened at host {:?}", url.host_str());
            Ok(url)
        }
        Ok(other) => Err(FlintError::Flint {
            message: format!("Portal was not opened: {other:?}"),
            location: ErrorLocation::from(Location::caller()),
        }),
        Err(DispatchError::Portal {
            directive, source, ..
        }) => {
            error!("Portal request failed: {source}");
            Err(FlintError::Recovery {
                message: directive.user_message().to_string(),
                directive,
                location: ErrorLocation::from(Location::caller()),
            })
        }
        Err(e) => Err(FlintError::Core {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
