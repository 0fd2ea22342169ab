pub mod classify;
pub mod connections;
pub mod portal;

use crate::error::FlintError;

use common::ErrorLocation;

use std::io::Read;
use std::panic::Location;
use std::path::Path;

/// Read a file, or stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<String, FlintError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| FlintError::Input {
            message: format!("Failed to read {}: {e}", path.display()),
            location: ErrorLocation::from(Location::caller()),
        }),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| FlintError::Input {
                    message: format!("Failed to read stdin: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            Ok(buffer)
        }
    }
}
