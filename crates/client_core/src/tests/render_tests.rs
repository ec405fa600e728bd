use std::collections::BTreeMap;

use shared::protocol::{Message, Severity};

use super::*;
use crate::{page::InMemoryDocument, session::SUBMIT_ID};

fn owner_session() -> PageSession<InMemoryDocument> {
    let document = InMemoryDocument::new()
        .with_decorated_field("firstName", "Jane")
        .with_decorated_field("lastName", "")
        .with_value("telephone", "12")
        .with_element(SUBMIT_ID);
    PageSession::open(document, &["firstName", "lastName", "telephone"], "")
}

fn slot(session: &PageSession<InMemoryDocument>, id: &str) -> (String, String) {
    let document = session.document();
    (
        document.text(&format!("{id}Msg")).unwrap_or_default(),
        document.class_name(&format!("{id}Group")).unwrap_or_default(),
    )
}

#[test]
fn field_error_marks_only_that_field() {
    let mut session = owner_session();
    session.disable_submit();

    apply_messages(
        &mut session,
        &[Message::field_error("lastName", "Last name is required")],
    );

    assert_eq!(
        slot(&session, "lastName"),
        ("Last name is required".to_string(), ERROR_STYLE.group.to_string())
    );
    assert_eq!(
        session.document().class_name("lastNameIcon").as_deref(),
        Some(ERROR_STYLE.icon)
    );
    assert_eq!(slot(&session, "firstName"), (String::new(), OK_STYLE.group.to_string()));
    assert!(!session.is_submit_disabled());
    assert!(session.alerts().is_empty());
}

#[test]
fn global_error_raises_an_alert() {
    let mut session = owner_session();

    apply_messages(&mut session, &[Message::error("Database is down")]);

    assert_eq!(session.alerts(), ["ERROR\nDatabase is down"]);
}

#[test]
fn non_error_messages_are_not_rendered() {
    let mut session = owner_session();

    apply_messages(
        &mut session,
        &[
            Message::new(Severity::Warning, "Name looks odd").for_field("firstName"),
            Message::new(Severity::Info, "Saved draft"),
        ],
    );

    assert_eq!(slot(&session, "firstName").0, "");
    assert!(session.alerts().is_empty());
}

#[test]
fn empty_apply_resets_previous_errors_and_is_idempotent() {
    let mut session = owner_session();
    apply_messages(
        &mut session,
        &[Message::field_error("firstName", "Too short")],
    );
    session.disable_submit();

    apply_messages(&mut session, &[]);
    let once = session.document().clone();
    apply_messages(&mut session, &[]);

    assert_eq!(slot(&session, "firstName"), (String::new(), OK_STYLE.group.to_string()));
    assert_eq!(
        session.document().class_name("firstNameIcon").as_deref(),
        Some(OK_STYLE.icon)
    );
    assert!(!session.is_submit_disabled());
    for id in ["firstNameMsg", "firstNameGroup", "firstNameIcon", "lastNameMsg"] {
        assert_eq!(once.element(id), session.document().element(id));
    }
}

#[test]
fn message_for_unbound_field_is_dropped() {
    let mut session = owner_session();

    apply_messages(&mut session, &[Message::field_error("ownerId", "Unknown owner")]);

    assert!(session.alerts().is_empty());
    assert_eq!(slot(&session, "firstName").0, "");
}

#[test]
fn page_without_fields_renders_nothing() {
    let document = InMemoryDocument::new().with_element(SUBMIT_ID);
    let mut session = PageSession::open(document, &[], "");
    session.disable_submit();

    let messages = BTreeMap::from([("firstName".to_string(), "x".to_string())]);
    set_field_messages(&mut session, &messages);
    apply_messages(&mut session, &[]);

    assert!(!session.is_submit_disabled());
    assert!(session.fields().is_empty());
}
