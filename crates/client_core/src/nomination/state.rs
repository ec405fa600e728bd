use std::{fmt, str::FromStr};

use crate::registry::Service;

use super::model::Nomination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Form,
    View,
    Sponsor,
    Admin,
    Logout,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Form => "/",
            Route::View => "/view",
            Route::Sponsor => "/sponsor",
            Route::Admin => "/admin",
            Route::Logout => "/logout",
        }
    }

    pub fn state(self) -> FormState {
        match self {
            Route::Form => FormState::New,
            Route::View => FormState::View,
            Route::Sponsor => FormState::Sponsor,
            Route::Admin => FormState::Admin,
            Route::Logout => FormState::Logout,
        }
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('/') {
            "" => Ok(Route::Form),
            "/view" => Ok(Route::View),
            "/sponsor" => Ok(Route::Sponsor),
            "/admin" => Ok(Route::Admin),
            "/logout" => Ok(Route::Logout),
            other => anyhow::bail!("no nomination route for '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    New,
    View,
    Sponsor,
    Admin,
    Logout,
}

impl FormState {
    /// Service that lists records for this view, and the response key holding them.
    pub fn listing(self) -> Option<(Service, &'static str)> {
        match self {
            FormState::View => Some((Service::GetNominations, "nominations")),
            FormState::Sponsor => Some((Service::GetSponsorNominations, "sponsors")),
            FormState::Admin => Some((Service::GetAllNominations, "nominations")),
            FormState::New | FormState::Logout => None,
        }
    }

    /// Whether `nomination` may be edited while in this state.
    pub fn editable_for(self, nomination: &Nomination) -> bool {
        match self {
            FormState::New => true,
            FormState::View | FormState::Sponsor => nomination.is_saved(),
            FormState::Admin | FormState::Logout => false,
        }
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormState::New => "new",
            FormState::View => "view",
            FormState::Sponsor => "sponsor",
            FormState::Admin => "admin",
            FormState::Logout => "logout",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
