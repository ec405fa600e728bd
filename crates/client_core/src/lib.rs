//! Browser-side form plumbing for the pet clinic and nomination apps.
//!
//! Pages bind their fields from a [`page::Document`], send payloads through a
//! [`dispatcher::Dispatcher`] and render server messages back onto the bound
//! fields with [`render::apply_messages`].

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod nomination;
pub mod page;
pub mod pet_clinic;
pub mod registry;
pub mod render;
pub mod session;
pub mod transport;

pub use config::{ClientSettings, DispatchMode};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, NominationError, TransportError};
pub use registry::{Service, ServiceRegistry};
pub use session::PageSession;
pub use transport::{FileUpload, HttpTransport, Transport, WireRequest};

#[cfg(test)]
mod test_support;
