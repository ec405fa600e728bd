//! Pet clinic pages: each controller reads its bound fields, dispatches, and decides where to go next.

use shared::protocol::{Payload, ServiceResponse};
use tracing::info;

use crate::{
    dispatcher::Dispatcher, error::DispatchError, page::Document, registry::Service, render,
    session::PageSession,
};

pub mod find_owners;
pub mod owner;
pub mod pet;
pub mod visit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Home,
    ShowOwner,
    EditOwner,
    EditPet,
    EditVisit,
}

impl PageId {
    pub fn file_name(self) -> &'static str {
        match self {
            PageId::Home => "welcome.html",
            PageId::ShowOwner => "ownerDetails.html",
            PageId::EditOwner => "editOwner.html",
            PageId::EditPet => "editPet.html",
            PageId::EditVisit => "editVisit.html",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub page: PageId,
    pub param: Option<String>,
}

impl Navigation {
    pub fn to(page: PageId) -> Self {
        Self { page, param: None }
    }

    pub fn with_param(page: PageId, param: impl Into<String>) -> Self {
        Self {
            page,
            param: Some(param.into()),
        }
    }

    pub fn href(&self) -> String {
        match &self.param {
            Some(param) => format!("{}?{}", self.page.file_name(), urlencoding::encode(param)),
            None => self.page.file_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Navigate(Navigation),
    Stay,
}

/// Routes a failed call to the page: server messages to fields, everything else to an alert.
pub fn report_failure<D: Document>(session: &mut PageSession<D>, err: &DispatchError) {
    match err {
        DispatchError::Rejected { messages, .. } => render::apply_messages(session, messages),
        DispatchError::MissingPathParam { .. } | DispatchError::Transport(_) => {
            session.alert(err.to_string());
            session.enable_submit();
        }
    }
}

/// Fetches a record and pushes its fields onto the page.
pub(crate) async fn load_into_page<D: Document>(
    session: &mut PageSession<D>,
    dispatcher: &Dispatcher,
    service: Service,
    payload: Payload,
) -> Option<ServiceResponse> {
    match dispatcher.call(service, payload).await {
        Ok(response) => {
            session.push_data(&response);
            Some(response)
        }
        Err(err) => {
            report_failure(session, &err);
            None
        }
    }
}

/// Disables submit, sends the bound field values and reports a failure on the page.
pub(crate) async fn submit_form<D: Document>(
    session: &mut PageSession<D>,
    dispatcher: &Dispatcher,
    service: Service,
) -> Option<ServiceResponse> {
    session.disable_submit();
    let payload = session.collect_payload();
    info!(service = %service, fields = payload.len(), "submitting form");
    match dispatcher.call(service, payload).await {
        Ok(response) => Some(response),
        Err(err) => {
            report_failure(session, &err);
            None
        }
    }
}

/// Success path shared by the pet and visit forms.
pub(crate) fn back_to_owner<D: Document>(session: &PageSession<D>) -> PageOutcome {
    match session.field_value("ownerId") {
        Some(owner_id) => PageOutcome::Navigate(Navigation::with_param(PageId::ShowOwner, owner_id)),
        None => PageOutcome::Navigate(Navigation::to(PageId::ShowOwner)),
    }
}

#[cfg(test)]
#[path = "tests/pages_tests.rs"]
mod tests;
