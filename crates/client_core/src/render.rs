//! Renders validation results onto bound fields.

use std::collections::BTreeMap;

use shared::protocol::Message;
use tracing::{debug, warn};

use crate::{page::Document, session::PageSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldStyle {
    pub group: &'static str,
    pub icon: &'static str,
}

pub const OK_STYLE: FieldStyle = FieldStyle {
    group: "form-group",
    icon: "glyphicon glyphicon-ok form-control-feedback",
};

pub const ERROR_STYLE: FieldStyle = FieldStyle {
    group: "form-group has-error",
    icon: "glyphicon glyphicon-remove form-control-feedback",
};

/// Terminal handler of a failed submission. Always re-enables submit.
pub fn apply_messages<D: Document>(session: &mut PageSession<D>, messages: &[Message]) {
    let mut field_messages = BTreeMap::new();
    for message in messages {
        if !message.is_error() {
            debug!(severity = %message.severity, text = %message.text, "non-error message not rendered");
            continue;
        }
        match &message.field_name {
            Some(field) => {
                field_messages.insert(field.clone(), message.text.clone());
            }
            None => session.alert(format!(
                "{}\n{}",
                message.severity.as_str().to_ascii_uppercase(),
                message.text
            )),
        }
    }
    set_field_messages(session, &field_messages);
    session.enable_submit();
}

/// Writes each bound field's message slot; fields without a message get the ok style.
pub fn set_field_messages<D: Document>(
    session: &mut PageSession<D>,
    messages: &BTreeMap<String, String>,
) {
    let (document, fields) = session.parts_mut();
    if fields.is_empty() {
        if !messages.is_empty() {
            warn!("This page has not defined fields. Messages are not going to be rendered..");
        }
        return;
    }

    for field in messages.keys().filter(|field| !fields.contains(field)) {
        warn!(field = %field, "message for a field that is not bound on this page; dropped");
    }

    for binding in fields.iter() {
        let Some(msg) = &binding.msg else {
            continue;
        };
        let (text, style) = match messages.get(&binding.field_id) {
            Some(text) => (text.as_str(), ERROR_STYLE),
            None => ("", OK_STYLE),
        };
        document.set_text(msg, text);
        if let Some(group) = &binding.group {
            document.set_class_name(group, style.group);
        }
        if let Some(icon) = &binding.icon {
            document.set_class_name(icon, style.icon);
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
