//! Linked brokerage/bank connections as reported by account sync.

pub mod builder;

use serde::{Deserialize, Serialize};

/// A provider connection. Owned by the account-sync subsystem; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub needs_reconnect: bool,
}

/// Health of a connection, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Healthy,
    Disabled,
    NeedsReconnect,
}

impl ConnectionRecord {
    /// A disabled connection reports `Disabled` even when it also needs reconnecting.
    pub fn status(&self) -> ConnectionStatus {
        if self.disabled {
            ConnectionStatus::Disabled
        } else if self.needs_reconnect {
            ConnectionStatus::NeedsReconnect
        } else {
            ConnectionStatus::Healthy
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status() == ConnectionStatus::Healthy
    }
}
