use shared::protocol::Payload;

use super::{load_into_page, submit_form, Navigation, PageId, PageOutcome};
use crate::{dispatcher::Dispatcher, page::Document, registry::Service, session::PageSession};

pub const FIELDS: &[&str] = &[
    "ownerId",
    "firstName",
    "lastName",
    "address",
    "city",
    "telephone",
];

/// Editing an existing owner when an id is passed, otherwise a blank form.
pub async fn load<D: Document>(session: &mut PageSession<D>, dispatcher: &Dispatcher) -> PageOutcome {
    if let Some(owner_id) = session.params().param_or("ownerId") {
        let payload = Payload::new().with("ownerId", owner_id);
        load_into_page(session, dispatcher, Service::GetOwner, payload).await;
    }
    PageOutcome::Stay
}

pub async fn submit<D: Document>(
    session: &mut PageSession<D>,
    dispatcher: &Dispatcher,
) -> PageOutcome {
    let Some(response) = submit_form(session, dispatcher, Service::SaveOwner).await else {
        return PageOutcome::Stay;
    };
    let key = response
        .text("ownerId")
        .or_else(|| session.field_value("ownerId"))
        .unwrap_or_default();
    PageOutcome::Navigate(Navigation::with_param(PageId::ShowOwner, key))
}
