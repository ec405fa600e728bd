//! Nomination form: one controller instance per browser page.

use shared::protocol::{Payload, ServiceResponse};
use tracing::{debug, info, warn};

use crate::{
    dispatcher::Dispatcher,
    error::{DispatchError, NominationError},
    registry::Service,
    transport::FileUpload,
};

use super::{
    model::{
        member_limit, Checklist, Employee, Member, Nomination, NominationStatus,
        MAX_ATTACHMENT_BYTES,
    },
    state::{FormState, Route},
    validation::{validate_member, validate_nomination, ValidationFlags},
};

pub const LOOKUP_PARAM: &str = "mailidpart";
pub const EMPLOYEES_KEY: &str = "employees";

pub struct NominationForm {
    dispatcher: Dispatcher,
    state: FormState,
    template: Nomination,
    nomination: Nomination,
    records: Vec<Nomination>,
    selected_row: usize,
    form_disabled: bool,
    plus_enabled: bool,
    draft_member: Member,
    editing_member: Option<usize>,
    attachment: Option<FileUpload>,
    flags: ValidationFlags,
    alerts: Vec<String>,
    employees: Vec<Employee>,
    max_attachment_bytes: u64,
}

impl NominationForm {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_template(dispatcher, Nomination::default())
    }

    /// `template` is what the blank form resets to on entering the new state.
    pub fn with_template(dispatcher: Dispatcher, template: Nomination) -> Self {
        Self {
            dispatcher,
            state: FormState::New,
            nomination: template.clone(),
            template,
            records: Vec::new(),
            selected_row: 0,
            form_disabled: false,
            plus_enabled: true,
            draft_member: Member::default(),
            editing_member: None,
            attachment: None,
            flags: ValidationFlags::default(),
            alerts: Vec::new(),
            employees: Vec::new(),
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
        }
    }

    pub fn with_max_attachment_bytes(mut self, limit: u64) -> Self {
        self.max_attachment_bytes = limit;
        self
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn nomination(&self) -> &Nomination {
        &self.nomination
    }

    pub fn nomination_mut(&mut self) -> &mut Nomination {
        &mut self.nomination
    }

    pub fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.nomination.checklist
    }

    pub fn records(&self) -> &[Nomination] {
        &self.records
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn is_disabled(&self) -> bool {
        self.form_disabled
    }

    pub fn is_plus_enabled(&self) -> bool {
        self.plus_enabled
    }

    pub fn draft_member(&self) -> &Member {
        &self.draft_member
    }

    pub fn draft_member_mut(&mut self) -> &mut Member {
        &mut self.draft_member
    }

    pub fn editing_member(&self) -> Option<usize> {
        self.editing_member
    }

    pub fn attachment(&self) -> Option<&FileUpload> {
        self.attachment.as_ref()
    }

    pub fn flags(&self) -> &ValidationFlags {
        &self.flags
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn alert(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(state = %self.state, alert = %text, "nomination alert");
        self.alerts.push(text);
    }

    /// Shows the failure to the user and hands it back to the caller.
    fn report(&mut self, err: NominationError) -> NominationError {
        let text = match &err {
            NominationError::Dispatch(DispatchError::Rejected { messages, .. })
                if !messages.is_empty() =>
            {
                messages
                    .iter()
                    .map(|m| m.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            other => other.to_string(),
        };
        self.alert(text);
        err
    }

    fn ensure_editable(&mut self) -> Result<(), NominationError> {
        if self.form_disabled {
            return Err(self.report(NominationError::ReadOnly));
        }
        Ok(())
    }

    fn refresh_plus(&mut self) {
        self.plus_enabled = match member_limit(&self.nomination.category) {
            Some(limit) => self.nomination.members.len() < limit,
            None => true,
        };
    }

    fn row(&mut self, index: usize) -> Result<Nomination, NominationError> {
        match self.records.get(index) {
            Some(record) => Ok(record.clone()),
            None => Err(self.report(NominationError::NoSuchRow(index))),
        }
    }

    /// Route change. List views fetch their records and seed the form with the first one.
    pub async fn enter(&mut self, route: Route) -> Result<(), NominationError> {
        self.state = route.state();
        self.flags = ValidationFlags::default();
        self.editing_member = None;
        self.draft_member = Member::default();
        self.attachment = None;
        self.records.clear();
        self.selected_row = 0;
        info!(state = %self.state, route = route.path(), "entering nomination view");

        match self.state {
            FormState::New => {
                self.nomination = self.template.clone();
                self.form_disabled = false;
                self.refresh_plus();
                Ok(())
            }
            FormState::Logout => {
                self.form_disabled = true;
                let result = self.dispatcher.transport().logout().await;
                result.map_err(|err| self.report(err.into()))
            }
            FormState::View | FormState::Sponsor | FormState::Admin => self.load_listing().await,
        }
    }

    async fn load_listing(&mut self) -> Result<(), NominationError> {
        let Some((service, key)) = self.state.listing() else {
            return Ok(());
        };
        // Nothing is editable until a listed record is seeded.
        self.form_disabled = true;
        let result = self.dispatcher.call(service, Payload::new()).await;
        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(self.report(err.into())),
        };
        self.records = match response.records::<Nomination>(key) {
            Ok(records) => records,
            Err(err) => return Err(self.report(err.into())),
        };
        debug!(service = %service, count = self.records.len(), "nominations listed");

        if let Some(first) = self.records.first() {
            self.nomination = first.clone();
            self.form_disabled = !self.state.editable_for(&self.nomination);
            self.refresh_plus();
        }
        Ok(())
    }

    /// Appends the draft member when it is complete and the category has room.
    pub fn add_member(&mut self) -> Result<(), NominationError> {
        self.ensure_editable()?;
        if let Err(failure) = validate_member(&self.draft_member, &mut self.flags) {
            return Err(self.report(failure.into()));
        }
        self.flags.reset_member();

        if let Some(limit) = member_limit(&self.nomination.category) {
            if self.nomination.members.len() >= limit {
                self.plus_enabled = false;
                let category = self.nomination.category.clone();
                return Err(self.report(NominationError::MemberLimit { category, limit }));
            }
        }

        let member = std::mem::take(&mut self.draft_member);
        debug!(email = %member.email, "member added");
        self.nomination.members.push(member);
        self.refresh_plus();
        Ok(())
    }

    pub fn remove_member(&mut self, index: usize) -> Result<Member, NominationError> {
        self.ensure_editable()?;
        if index >= self.nomination.members.len() {
            return Err(self.report(NominationError::NoSuchRow(index)));
        }
        let removed = self.nomination.members.remove(index);
        self.editing_member = match self.editing_member {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        self.refresh_plus();
        Ok(removed)
    }

    /// Opens a listed member for in-place editing.
    pub fn edit_member(&mut self, index: usize) -> Result<&mut Member, NominationError> {
        self.ensure_editable()?;
        if index >= self.nomination.members.len() {
            return Err(self.report(NominationError::NoSuchRow(index)));
        }
        self.editing_member = Some(index);
        Ok(&mut self.nomination.members[index])
    }

    pub fn save_member(&mut self) {
        self.editing_member = None;
    }

    /// Stages an attachment for the next submit or update. An oversized file leaves the staged one in place.
    pub fn select_file(&mut self, file: FileUpload) -> Result<(), NominationError> {
        self.ensure_editable()?;
        let size = file.size();
        if size > self.max_attachment_bytes {
            return Err(self.report(NominationError::FileTooLarge {
                size,
                limit: self.max_attachment_bytes,
            }));
        }
        debug!(name = %file.name, size, "attachment staged");
        self.attachment = Some(file);
        Ok(())
    }

    fn prepare(&mut self, status: NominationStatus) -> Result<Nomination, NominationError> {
        self.flags.reset_submit();
        let mut data = self.nomination.clone();
        data.status = Some(status);
        data.email = status != NominationStatus::Saved;
        if let Err(failure) = validate_nomination(&data, status, &mut self.flags) {
            return Err(self.report(failure.into()));
        }
        Ok(data)
    }

    /// Uploads the staged attachment first, if any, then saves the record carrying its token.
    async fn store(
        &self,
        service: Service,
        mut data: Nomination,
        attachment: Option<FileUpload>,
    ) -> Result<(Nomination, ServiceResponse), NominationError> {
        if let Some(file) = attachment {
            let (name, mime_type, size) = (file.name.clone(), file.mime_type.clone(), file.size());
            let key = self.dispatcher.transport().upload_file(file).await?;
            info!(name = %name, size, "attachment uploaded");
            data.file_key = key;
            data.file_name = name;
            data.file_type = mime_type;
            data.file_size = Some(size);
        }
        let payload = Payload::from_record(&data)?.unwrap_or_default();
        let response = self.dispatcher.call(service, payload).await?;
        Ok((data, response))
    }

    /// Creates a nomination with `status`. The staged attachment is consumed either way.
    pub async fn submit(&mut self, status: NominationStatus) -> Result<ServiceResponse, NominationError> {
        self.ensure_editable()?;
        let data = self.prepare(status)?;
        let attachment = self.attachment.take();
        let result = self.store(Service::NewNomination, data, attachment).await;
        match result {
            Ok((data, response)) => {
                self.nomination.file_key = data.file_key;
                self.nomination.file_name = data.file_name;
                self.nomination.file_type = data.file_type;
                self.nomination.file_size = data.file_size;
                self.alert(format!("Data {status} successfully"));
                Ok(response)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Stores changes to the nomination opened from a listing.
    pub async fn update(&mut self, status: NominationStatus) -> Result<ServiceResponse, NominationError> {
        if !matches!(self.state, FormState::View | FormState::Sponsor) || self.records.is_empty() {
            return Err(self.report(NominationError::NotListed));
        }
        self.ensure_editable()?;
        let data = self.prepare(status)?;
        let attachment = self.attachment.clone();
        let result = self.store(Service::UpdateNomination, data, attachment).await;
        match result {
            Ok((mut data, response)) => {
                self.attachment = None;
                data.checklist = self.nomination.checklist.clone();
                if let Some(record) = self.records.get_mut(self.selected_row) {
                    *record = data.clone();
                }
                self.nomination = data;
                self.form_disabled = !self.state.editable_for(&self.nomination);
                self.alert("Details updated successfully!!!");
                Ok(response)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub async fn remove_nomination(&mut self, index: usize) -> Result<Nomination, NominationError> {
        let record = self.row(index)?;
        let payload = match Payload::from_record(&record) {
            Ok(payload) => payload.unwrap_or_default(),
            Err(err) => return Err(self.report(err.into())),
        };
        let result = self.dispatcher.call(Service::DeleteNomination, payload).await;
        if let Err(err) = result {
            return Err(self.report(err.into()));
        }
        let removed = self.records.remove(index);
        if self.selected_row >= self.records.len() {
            self.selected_row = self.records.len().saturating_sub(1);
        }
        info!(index, remaining = self.records.len(), "nomination deleted");
        Ok(removed)
    }

    /// Loads a listed record into the form with a fresh checklist.
    pub fn view_submission(&mut self, index: usize) -> Result<(), NominationError> {
        let mut record = self.row(index)?;
        record.checklist = Checklist::default();
        self.nomination = record;
        self.selected_row = index;
        self.editing_member = None;
        self.attachment = None;
        if self.state != FormState::Admin {
            self.form_disabled = !self.state.editable_for(&self.nomination);
        }
        self.refresh_plus();
        Ok(())
    }

    pub fn set_clicked_row(&mut self, index: usize) -> Result<(), NominationError> {
        if index >= self.records.len() {
            return Err(self.report(NominationError::NoSuchRow(index)));
        }
        self.selected_row = index;
        Ok(())
    }

    /// Fetches the current nomination's attachment. `None` when nothing is attached.
    pub async fn download_attachment(&mut self) -> Result<Option<Vec<u8>>, NominationError> {
        if !self.nomination.has_attachment() {
            return Ok(None);
        }
        let Nomination {
            file_key,
            file_name,
            file_type,
            ..
        } = &self.nomination;
        let result = self
            .dispatcher
            .transport()
            .download_file(file_key, file_name, file_type)
            .await;
        match result {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => Err(self.report(err.into())),
        }
    }

    /// Directory suggestions for a partial mail id. Failures are logged, not alerted.
    pub async fn lookup_employees(&mut self, mail_part: &str) -> Result<&[Employee], NominationError> {
        let payload = Payload::new().with(LOOKUP_PARAM, mail_part);
        let result = self.dispatcher.call(Service::LookupEmployees, payload).await;
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(mail_part, error = %err, "employee lookup failed");
                return Err(err.into());
            }
        };
        self.employees = response.records(EMPLOYEES_KEY)?;
        debug!(mail_part, count = self.employees.len(), "employee suggestions");
        Ok(&self.employees)
    }

    pub fn populate_sponsor(&mut self, chosen: &Employee) {
        self.nomination.sponsor_mail = chosen.mail.clone();
        self.nomination.sponsor_name = chosen.name.clone();
        self.nomination.sponsor_number = chosen.employee_no.clone();
    }

    pub fn populate_member(&mut self, chosen: &Employee) {
        self.draft_member.email = chosen.mail.clone();
        self.draft_member.name = chosen.name.clone();
        self.draft_member.employee_no = chosen.employee_no.clone();
        self.draft_member.unit = chosen.unit.clone();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
