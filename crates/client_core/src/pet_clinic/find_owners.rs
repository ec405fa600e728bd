use serde_json::Value;
use shared::protocol::Payload;
use tracing::warn;

use super::report_failure;
use crate::{dispatcher::Dispatcher, page::Document, registry::Service, session::PageSession};

pub const FIELDS: &[&str] = &["ownerTab", "found", "find", "lastName", "message", "serviceName"];

pub const NOT_FOUND_TEXT: &str = "has not been found";

#[derive(Debug, Clone, PartialEq)]
pub enum FindOutcome {
    Found(Vec<Value>),
    NotFound,
    Failed,
}

pub fn load<D: Document>(session: &mut PageSession<D>) {
    session.document_mut().set_hidden("found", true);
}

/// Owners whose last name starts with the typed text, via the selected service variant.
pub async fn find<D: Document>(session: &mut PageSession<D>, dispatcher: &Dispatcher) -> FindOutcome {
    let mut payload = Payload::new();
    if let Some(last_name) = session.field_value("lastName") {
        payload.insert("lastName", last_name);
        payload.insert("lastNameComparator", "~");
    }

    let service = match session.field_value("serviceName") {
        Some(key) => key.parse().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to the default owner filter");
            Service::FindOwners0
        }),
        None => Service::FindOwners0,
    };

    let response = match dispatcher.call(service, payload).await {
        Ok(response) => response,
        Err(err) => {
            report_failure(session, &err);
            return FindOutcome::Failed;
        }
    };

    let owners: Vec<Value> = match response.records("owners") {
        Ok(owners) => owners,
        Err(err) => {
            warn!(error = %err, "owners list is malformed");
            Vec::new()
        }
    };
    if owners.is_empty() {
        session.document_mut().set_text("message", NOT_FOUND_TEXT);
        return FindOutcome::NotFound;
    }

    let document = session.document_mut();
    document.set_hidden("find", true);
    document.set_hidden("found", false);
    session.push_data(&response);
    FindOutcome::Found(owners)
}
