pub mod config;
pub mod dispatch;
pub mod portal;

pub use config::ConfigError;
pub use dispatch::DispatchError;
pub use portal::PortalError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
