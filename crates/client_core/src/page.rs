//! Page document abstraction and the field binder.

use std::collections::HashMap;

use tracing::{debug, warn};

pub const GROUP_SUFFIX: &str = "Group";
pub const ICON_SUFFIX: &str = "Icon";
pub const MSG_SUFFIX: &str = "Msg";

/// Element access by id. Setters return `false` when the id is not present.
pub trait Document {
    fn has_element(&self, id: &str) -> bool;
    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    fn text(&self, id: &str) -> Option<String>;
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    fn class_name(&self, id: &str) -> Option<String>;
    fn set_class_name(&mut self, id: &str, class_name: &str) -> bool;
    fn is_disabled(&self, id: &str) -> bool;
    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool;
    fn is_hidden(&self, id: &str) -> bool;
    fn set_hidden(&mut self, id: &str, hidden: bool) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub value: String,
    pub text: String,
    pub class_name: String,
    pub disabled: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    elements: HashMap<String, Element>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.elements.insert(id.into(), Element::default());
        self
    }

    pub fn with_value(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.elements.insert(
            id.into(),
            Element {
                value: value.into(),
                ..Element::default()
            },
        );
        self
    }

    /// Adds the field element together with its group, icon and message slots.
    pub fn with_decorated_field(mut self, id: &str, value: impl Into<String>) -> Self {
        self = self.with_value(id, value);
        for suffix in [GROUP_SUFFIX, ICON_SUFFIX, MSG_SUFFIX] {
            self.elements
                .insert(format!("{id}{suffix}"), Element::default());
        }
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    fn update(&mut self, id: &str, apply: impl FnOnce(&mut Element)) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                apply(element);
                true
            }
            None => false,
        }
    }
}

impl Document for InMemoryDocument {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn value(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|e| e.value.clone())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        self.update(id, |e| e.value = value.to_string())
    }

    fn text(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|e| e.text.clone())
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.update(id, |e| e.text = text.to_string())
    }

    fn class_name(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|e| e.class_name.clone())
    }

    fn set_class_name(&mut self, id: &str, class_name: &str) -> bool {
        self.update(id, |e| e.class_name = class_name.to_string())
    }

    fn is_disabled(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.disabled)
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        self.update(id, |e| e.disabled = disabled)
    }

    fn is_hidden(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|e| e.hidden)
    }

    fn set_hidden(&mut self, id: &str, hidden: bool) -> bool {
        self.update(id, |e| e.hidden = hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field_id: String,
    pub primary: String,
    pub group: Option<String>,
    pub icon: Option<String>,
    pub msg: Option<String>,
}

/// Bound fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    bindings: Vec<FieldBinding>,
}

impl FieldTable {
    pub fn get(&self, field_id: &str) -> Option<&FieldBinding> {
        self.bindings.iter().find(|b| b.field_id == field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.get(field_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

pub fn bind_page<D: Document + ?Sized>(document: &D, field_ids: &[&str]) -> FieldTable {
    let mut bindings = Vec::with_capacity(field_ids.len());
    for &field_id in field_ids {
        if !document.has_element(field_id) {
            warn!(field = field_id, "No dom element for id {field_id}");
            continue;
        }
        let related = |suffix: &str| {
            let id = format!("{field_id}{suffix}");
            document.has_element(&id).then_some(id)
        };
        bindings.push(FieldBinding {
            field_id: field_id.to_string(),
            primary: field_id.to_string(),
            group: related(GROUP_SUFFIX),
            icon: related(ICON_SUFFIX),
            msg: related(MSG_SUFFIX),
        });
    }
    debug!(declared = field_ids.len(), bound = bindings.len(), "page fields bound");
    FieldTable { bindings }
}

/// Parameters passed to a page in its location query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    /// A lone value without a name, as in `ownerDetails.html?7`.
    pub param: Option<String>,
    named: HashMap<String, String>,
}

impl PageParams {
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        if query.is_empty() {
            return params;
        }
        // Walked back to front: the first named occurrence and the last bare token win.
        for part in query.split('&').rev() {
            let pair: Vec<&str> = part.split('=').collect();
            match pair.as_slice() {
                [bare] => {
                    if params.param.is_some() {
                        warn!(query, "Invalid queryString {query}");
                    } else {
                        params.param = Some(decode(bare));
                    }
                }
                [name, value] => {
                    params.named.insert(decode(name), decode(value));
                }
                _ => warn!(part, "Invalid queryString part {part}"),
            }
        }
        params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// The bare parameter, falling back to the named one.
    pub fn param_or(&self, name: &str) -> Option<String> {
        self.param
            .clone()
            .or_else(|| self.get(name).map(str::to_string))
            .filter(|value| !value.is_empty())
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
