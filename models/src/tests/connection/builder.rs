use crate::{ConnectionRecordBuilder, ModelError};

/// **VALUE**: Verifies that builder validation rejects a missing id.
///
/// **WHY THIS MATTERS**: The id is the `reconnect` payload sent to the portal endpoint.
/// A record without one cannot be reconnected at all.
///
/// **BUG THIS CATCHES**: Would catch if the required-field check is dropped.
#[test]
fn given_missing_id_when_building_then_returns_validation_error() {
    // GIVEN: Builder without id
    let builder = ConnectionRecordBuilder::default().with_name("Robinhood");

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Should return validation error
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Connection id is required");
        }
    }
}

#[test]
fn given_blank_id_when_building_then_returns_validation_error() {
    let result = ConnectionRecordBuilder::default()
        .with_id("   ")
        .with_name("Robinhood")
        .build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Connection id cannot be empty");
        }
    }
}

#[test]
fn given_missing_name_when_building_then_returns_validation_error() {
    let result = ConnectionRecordBuilder::default().with_id("auth-1").build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Connection name is required");
        }
    }
}

#[test]
fn given_empty_name_when_building_then_returns_validation_error() {
    let result = ConnectionRecordBuilder::default()
        .with_id("auth-1")
        .with_name("")
        .build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Connection name cannot be empty");
        }
    }
}

/// **VALUE**: Happy path, including the false defaults for both flags.
#[test]
fn given_id_and_name_when_building_then_flags_default_to_false() {
    // GIVEN: Builder with only required fields
    let builder = ConnectionRecordBuilder::default()
        .with_id("auth-1")
        .with_name("Robinhood");

    // WHEN: Building
    let record = builder.build().unwrap();

    // THEN: Fields populated, flags false
    assert_eq!(record.id, "auth-1");
    assert_eq!(record.name, "Robinhood");
    assert!(!record.disabled);
    assert!(!record.needs_reconnect);
}
