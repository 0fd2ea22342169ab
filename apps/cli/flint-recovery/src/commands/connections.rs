use crate::error::FlintError;

use common::ErrorLocation;
use models::{ConnectionRecord, ConnectionStatus, RecoveryDirective};
use recovery_core::classify_connection;

use std::panic::Location;

use log::info;
use serde::Serialize;

/// One line of the connections report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub id: String,
    pub name: String,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<RecoveryDirective>,
}

/// Derive status and directive for every record in a JSON array.
pub fn run(input: &str) -> Result<Vec<ConnectionReport>, FlintError> {
    let records: Vec<ConnectionRecord> =
        serde_json::from_str(input.trim()).map_err(|e| FlintError::Input {
            message: format!("Invalid connection list JSON: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let reports: Vec<ConnectionReport> = records
        .into_iter()
        .map(|record| ConnectionReport {
            status: record.status(),
            directive: classify_connection(&record),
            id: record.id,
            name: record.name,
        })
        .collect();

    let unhealthy = reports
        .iter()
        .filter(|r| r.status != ConnectionStatus::Healthy)
        .count();
    info!(
        "Checked {} connections, {unhealthy} need attention",
        reports.len()
    );

    Ok(reports)
}
