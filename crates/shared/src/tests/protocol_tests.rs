use serde_json::json;

use crate::{
    domain::{HttpMethod, ServiceDescriptor},
    error::DescriptorError,
    protocol::{Message, Payload, RequestStatus, ServiceResponse, Severity},
};

#[test]
fn payload_keeps_insertion_order_after_remove() {
    let mut payload = Payload::new()
        .with("zeta", "1")
        .with("ownerId", "7")
        .with("alpha", "2");
    assert_eq!(payload.remove("ownerId"), Some(json!("7")));
    let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn payload_text_skips_null_and_empty() {
    let payload = Payload::new()
        .with("a", "")
        .with("b", serde_json::Value::Null)
        .with("c", 12)
        .with("d", "x");
    assert_eq!(payload.text("a"), None);
    assert_eq!(payload.text("b"), None);
    assert_eq!(payload.text("c").as_deref(), Some("12"));
    assert_eq!(payload.text("d").as_deref(), Some("x"));
    assert_eq!(payload.text("missing"), None);
}

#[test]
fn severity_parses_any_case() {
    assert_eq!("ERROR".parse::<Severity>().expect("error"), Severity::Error);
    assert_eq!("Warning".parse::<Severity>().expect("warning"), Severity::Warning);
    assert!("fatal".parse::<Severity>().is_err());
}

#[test]
fn error_envelope_decodes_messages_and_keeps_data() {
    let raw = json!({
        "_requestStatus": "error",
        "_messages": [
            {"messageType": "Error", "fieldName": "firstName", "text": "this field is in error"},
            {"messageType": "info", "text": "saved draft"}
        ],
        "ownerId": 7
    });
    let response: ServiceResponse = serde_json::from_value(raw).expect("decode");
    assert_eq!(response.status, RequestStatus::Error);
    assert!(response.is_error());
    assert_eq!(
        response.messages[0],
        Message::field_error("firstName", "this field is in error")
    );
    assert_eq!(response.messages[1].severity, Severity::Info);
    assert_eq!(response.text("ownerId").as_deref(), Some("7"));
}

#[test]
fn envelope_without_status_is_ok() {
    let response: ServiceResponse =
        serde_json::from_value(json!({"owners": [{"ownerId": 1}]})).expect("decode");
    assert!(!response.is_error());
    let owners: Vec<serde_json::Value> = response.records("owners").expect("owners");
    assert_eq!(owners.len(), 1);
    let missing: Vec<serde_json::Value> = response.records("pets").expect("pets");
    assert!(missing.is_empty());
}

#[test]
fn descriptor_validation_rejects_misconfigured_path_param() {
    let descriptor = ServiceDescriptor::get("pet.owner.get", "owner/id").with_path_param("ownerId");
    assert!(matches!(
        descriptor.validate(),
        Err(DescriptorError::PathParamWithoutSlash { .. })
    ));

    let absolute = ServiceDescriptor::post("pet.owner.save", "/owner");
    assert!(matches!(
        absolute.validate(),
        Err(DescriptorError::AbsolutePath { .. })
    ));

    let fine = ServiceDescriptor::get("pet.owner.get", "owner/id/").with_path_param("ownerId");
    assert_eq!(fine.method, HttpMethod::Get);
    assert!(fine.validate().is_ok());
}
