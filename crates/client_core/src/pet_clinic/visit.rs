use shared::protocol::Payload;

use super::{back_to_owner, load_into_page, submit_form, Navigation, PageId, PageOutcome};
use crate::{dispatcher::Dispatcher, page::Document, registry::Service, session::PageSession};

pub const FIELDS: &[&str] = &["ownerId", "petId", "visitDescription", "visitDate"];

const USAGE: &str =
    "This page is to be invoked as .html?12 where 12 is the petId for which visit is to be added";

pub async fn load<D: Document>(session: &mut PageSession<D>, dispatcher: &Dispatcher) -> PageOutcome {
    let Some(pet_id) = session.params().param_or("petId") else {
        session.alert(USAGE);
        return PageOutcome::Navigate(Navigation::to(PageId::Home));
    };
    session.set_field_value("petId", &pet_id);
    let payload = Payload::new().with("petId", pet_id);
    load_into_page(session, dispatcher, Service::GetPet, payload).await;
    PageOutcome::Stay
}

pub async fn submit<D: Document>(
    session: &mut PageSession<D>,
    dispatcher: &Dispatcher,
) -> PageOutcome {
    match submit_form(session, dispatcher, Service::SaveVisit).await {
        Some(_) => back_to_owner(session),
        None => PageOutcome::Stay,
    }
}
