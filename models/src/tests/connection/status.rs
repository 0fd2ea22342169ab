use crate::{ConnectionRecord, ConnectionRecordBuilder, ConnectionStatus};

fn record(disabled: bool, needs_reconnect: bool) -> ConnectionRecord {
    ConnectionRecordBuilder::default()
        .with_id("auth-1")
        .with_name("Fidelity")
        .with_disabled(disabled)
        .with_needs_reconnect(needs_reconnect)
        .build()
        .unwrap()
}

#[test]
fn given_flag_combinations_when_status_derived_then_disabled_wins() {
    assert_eq!(record(false, false).status(), ConnectionStatus::Healthy);
    assert_eq!(record(false, true).status(), ConnectionStatus::NeedsReconnect);
    assert_eq!(record(true, false).status(), ConnectionStatus::Disabled);
    assert_eq!(record(true, true).status(), ConnectionStatus::Disabled);
    assert!(record(false, false).is_healthy());
}

/// **VALUE**: Records decode from the account-sync camelCase shape with optional flags.
///
/// **BUG THIS CATCHES**: Would catch a missing `rename_all = "camelCase"`, which silently
/// drops `needsReconnect` and reports every broken connection as healthy.
#[test]
fn given_camel_case_json_when_decoded_then_flags_are_read() {
    // GIVEN
    let json = r#"[
        {"id": "a", "name": "Schwab", "needsReconnect": true},
        {"id": "b", "name": "Vanguard"}
    ]"#;

    // WHEN
    let records: Vec<ConnectionRecord> = serde_json::from_str(json).unwrap();

    // THEN
    assert!(records[0].needs_reconnect);
    assert!(!records[0].disabled);
    assert_eq!(records[1].status(), ConnectionStatus::Healthy);
}
