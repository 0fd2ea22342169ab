use crate::commands::classify::{parse_failure, run};
use crate::error::FlintError;

use models::ErrorCode;

#[test]
fn given_error_response_json_when_classified_then_directive_returned() {
    let input = r#"{"error":{"code":"SIGNATURE_INVALID","message":"expired"},"httpStatus":401}"#;

    let directive = run(Some(input), None).unwrap();

    assert!(directive.should_reconnect());
}

#[test]
fn given_network_message_when_classified_then_input_ignored() {
    let directive = run(Some("not json"), Some("connection reset")).unwrap();

    assert_eq!(directive.retry_delay_ms(), Some(3000));
}

#[test]
fn given_unknown_wire_code_when_parsed_then_unknown_code() {
    let failure = parse_failure(r#"{"error":{"code":"BROKERAGE_ON_FIRE","message":"x"}}"#)
        .unwrap();

    assert_eq!(failure.response().unwrap().code(), ErrorCode::Unknown);
}

#[test]
fn given_malformed_json_when_classified_then_input_error() {
    let err = run(Some("{"), None).unwrap_err();

    assert!(matches!(err, FlintError::Input { .. }));
}
