use thiserror::Error;

use super::model::{Member, Nomination, NominationStatus};

/// Inline error markers shown next to the offending inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationFlags {
    pub title: bool,
    pub sponsor: bool,
    pub member: bool,
    pub contribution: bool,
    pub member_mail: bool,
}

impl ValidationFlags {
    /// Flags owned by the submit path; member-entry flags are left alone.
    pub fn reset_submit(&mut self) {
        self.title = false;
        self.sponsor = false;
        self.member = false;
    }

    pub fn reset_member(&mut self) {
        self.contribution = false;
        self.member_mail = false;
    }

    pub fn any(&self) -> bool {
        self.title || self.sponsor || self.member || self.contribution || self.member_mail
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Nomination title is required")]
    MissingTitle,
    #[error("Please fill the required fields before submitting")]
    MissingRequired,
    #[error("Please check and confirm the check-box data before proceeding")]
    UnconfirmedChecklist,
    #[error("Please fill required fields")]
    IncompleteMember,
}

/// Checks a nomination about to be stored with `status`. Stops at the first failing rule.
pub fn validate_nomination(
    nomination: &Nomination,
    status: NominationStatus,
    flags: &mut ValidationFlags,
) -> Result<(), ValidationFailure> {
    if nomination.title.trim().is_empty() {
        flags.title = true;
        return Err(ValidationFailure::MissingTitle);
    }

    if status == NominationStatus::Submitted {
        flags.sponsor = nomination.sponsor_mail.trim().is_empty();
        flags.member = nomination.members.is_empty();
        if flags.sponsor || flags.member {
            return Err(ValidationFailure::MissingRequired);
        }
    }

    if status != NominationStatus::Saved && !nomination.checklist.is_complete() {
        return Err(ValidationFailure::UnconfirmedChecklist);
    }
    Ok(())
}

/// Contribution and email are both required before a member joins the list.
pub fn validate_member(member: &Member, flags: &mut ValidationFlags) -> Result<(), ValidationFailure> {
    flags.contribution = member.contribution.trim().is_empty();
    flags.member_mail = member.email.trim().is_empty();
    if flags.contribution || flags.member_mail {
        return Err(ValidationFailure::IncompleteMember);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
