use crate::{ConnectionRecord, ErrorLocation, ModelError};

use std::panic::Location;

/// Builder for validated ConnectionRecord instances.
///
/// `id` and `name` are required and must be non-blank. Both flags default
/// to `false`.
#[derive(Debug, Default)]
pub struct ConnectionRecordBuilder {
    id: Option<String>,
    name: Option<String>,
    disabled: bool,
    needs_reconnect: bool,
}

impl ConnectionRecordBuilder {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_needs_reconnect(mut self, needs_reconnect: bool) -> Self {
        self.needs_reconnect = needs_reconnect;
        self
    }

    /// Build the ConnectionRecord with validation.
    #[track_caller]
    pub fn build(self) -> Result<ConnectionRecord, ModelError> {
        let id = self.id.ok_or_else(|| ModelError::Validation {
            message: String::from("Connection id is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if id.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Connection id cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let name = self.name.ok_or_else(|| ModelError::Validation {
            message: String::from("Connection name is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if name.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Connection name cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(ConnectionRecord {
            id,
            name,
            disabled: self.disabled,
            needs_reconnect: self.needs_reconnect,
        })
    }
}
