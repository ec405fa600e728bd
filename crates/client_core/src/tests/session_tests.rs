use serde_json::json;

use super::*;
use crate::page::InMemoryDocument;

fn owner_page() -> InMemoryDocument {
    InMemoryDocument::new()
        .with_decorated_field("firstName", "Jane")
        .with_decorated_field("lastName", "")
        .with_value("city", "Oslo")
        .with_element(SUBMIT_ID)
}

#[test]
fn opening_a_page_clears_stale_messages() {
    let mut document = owner_page();
    document.set_text("firstNameMsg", "stale");

    let session = PageSession::open(document, &["firstName", "lastName", "city"], "?5");

    assert_eq!(session.document().text("firstNameMsg").as_deref(), Some(""));
    assert_eq!(
        session.document().class_name("firstNameGroup").as_deref(),
        Some("form-group")
    );
    assert_eq!(session.params().param.as_deref(), Some("5"));
}

#[test]
fn payload_holds_non_empty_values_in_declaration_order() {
    let session = PageSession::open(owner_page(), &["city", "lastName", "firstName"], "");

    let payload = session.collect_payload();

    let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
    assert_eq!(keys, ["city", "firstName"]);
    assert_eq!(payload.text("firstName").as_deref(), Some("Jane"));
}

#[test]
fn push_data_writes_scalars_to_bound_fields_only() {
    let mut session = PageSession::open(owner_page(), &["firstName", "lastName", "city"], "");
    let response = ServiceResponse::ok(
        json!({
            "lastName": "Doe",
            "ownerId": 7,
            "city": null,
            "pets": [{"name": "Rex"}]
        })
        .as_object()
        .cloned()
        .unwrap(),
    );

    let written = session.push_data(&response);

    assert_eq!(written, 2);
    assert_eq!(session.field_value("lastName").as_deref(), Some("Doe"));
    assert_eq!(session.field_value("city"), None);
}

#[test]
fn submit_control_toggles() {
    let mut session = PageSession::open(owner_page(), &["firstName"], "");
    session.disable_submit();
    assert!(session.is_submit_disabled());
    session.enable_submit();
    assert!(!session.is_submit_disabled());
}

#[test]
fn alerts_are_drained() {
    let mut session = PageSession::open(owner_page(), &["firstName"], "");
    session.alert("first");
    session.alert("second");
    assert_eq!(session.alerts().len(), 2);
    assert_eq!(session.take_alerts(), ["first", "second"]);
    assert!(session.alerts().is_empty());
}
