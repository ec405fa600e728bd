//! Page-scoped context shared by the binder, the renderer and the submit handlers.

use std::collections::BTreeMap;

use shared::protocol::{scalar_text, Payload, ServiceResponse};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    page::{bind_page, Document, FieldTable, PageParams},
    render,
};

pub const SUBMIT_ID: &str = "submit";

pub struct PageSession<D: Document> {
    document: D,
    fields: FieldTable,
    params: PageParams,
    alerts: Vec<String>,
}

impl<D: Document> PageSession<D> {
    /// Binds the declared fields, parses the location query and clears every message slot.
    pub fn open(document: D, field_ids: &[&str], query: &str) -> Self {
        let fields = bind_page(&document, field_ids);
        let mut session = Self {
            document,
            fields,
            params: PageParams::parse(query),
            alerts: Vec::new(),
        };
        render::set_field_messages(&mut session, &BTreeMap::new());
        session
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut D, &FieldTable) {
        (&mut self.document, &self.fields)
    }

    pub fn params(&self) -> &PageParams {
        &self.params
    }

    /// Records a blocking alert for the user.
    pub fn alert(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(alert = %text, "page alert");
        self.alerts.push(text);
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn disable_submit(&mut self) {
        self.document.set_disabled(SUBMIT_ID, true);
    }

    pub fn enable_submit(&mut self) {
        self.document.set_disabled(SUBMIT_ID, false);
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.document.is_disabled(SUBMIT_ID)
    }

    pub fn field_value(&self, field_id: &str) -> Option<String> {
        let binding = self.fields.get(field_id)?;
        self.document
            .value(&binding.primary)
            .filter(|value| !value.is_empty())
    }

    pub fn set_field_value(&mut self, field_id: &str, value: &str) -> bool {
        match self.fields.get(field_id) {
            Some(binding) => self.document.set_value(&binding.primary, value),
            None => false,
        }
    }

    /// Non-empty values of every bound field, in declaration order.
    pub fn collect_payload(&self) -> Payload {
        self.fields
            .iter()
            .filter_map(|binding| {
                self.document
                    .value(&binding.primary)
                    .filter(|value| !value.is_empty())
                    .map(|value| (binding.field_id.clone(), value))
            })
            .collect()
    }

    /// Copies scalar response fields into the bound fields of the same name.
    pub fn push_data(&mut self, response: &ServiceResponse) -> usize {
        let mut written = 0;
        for (key, value) in &response.data {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                continue;
            }
            if self.set_field_value(key, &scalar_text(value)) {
                written += 1;
            }
        }
        debug!(written, "pushed response data to page");
        written
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
