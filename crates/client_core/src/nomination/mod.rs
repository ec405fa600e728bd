//! Award nomination form: model, validation rules, view states and the page controller.

pub mod controller;
pub mod model;
pub mod state;
pub mod validation;

pub use controller::NominationForm;
pub use model::{Employee, Member, Nomination, NominationStatus};
pub use state::{FormState, Route};
pub use validation::{ValidationFailure, ValidationFlags};
