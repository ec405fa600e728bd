use shared::protocol::Payload;

use super::{back_to_owner, load_into_page, submit_form, Navigation, PageId, PageOutcome};
use crate::{dispatcher::Dispatcher, page::Document, registry::Service, session::PageSession};

pub const FIELDS: &[&str] = &["ownerId", "petId", "petName", "petDob", "petTypeId"];

pub const HEADING_ID: &str = "hdr";

const USAGE: &str = "This page is to be invoked as .html?ownerId=1 to add a pet to owner with id 1, or .html?petId=1 to edit pet with id of 1";

pub async fn load<D: Document>(session: &mut PageSession<D>, dispatcher: &Dispatcher) -> PageOutcome {
    load_into_page(session, dispatcher, Service::GetPetTypes, Payload::new()).await;

    if let Some(pet_id) = session.params().param_or("petId") {
        let payload = Payload::new().with("petId", pet_id);
        load_into_page(session, dispatcher, Service::GetPet, payload).await;
        return PageOutcome::Stay;
    }

    if let Some(owner_id) = session.params().get("ownerId").map(str::to_string) {
        session.document_mut().set_text(HEADING_ID, "Add Pet");
        let payload = Payload::new().with("ownerId", owner_id);
        load_into_page(session, dispatcher, Service::GetOwner, payload).await;
        return PageOutcome::Stay;
    }

    session.alert(USAGE);
    PageOutcome::Navigate(Navigation::to(PageId::Home))
}

pub async fn submit<D: Document>(
    session: &mut PageSession<D>,
    dispatcher: &Dispatcher,
) -> PageOutcome {
    match submit_form(session, dispatcher, Service::SavePet).await {
        Some(_) => back_to_owner(session),
        None => PageOutcome::Stay,
    }
}
