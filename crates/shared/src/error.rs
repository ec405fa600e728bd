use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("service descriptor for path '{path}' has no logical name")]
    EmptyName { path: String },
    #[error("service {service} has an empty endpoint path")]
    EmptyPath { service: String },
    #[error("service {service} path '{path}' must be relative to the rest root")]
    AbsolutePath { service: String, path: String },
    #[error("service {service} declares an empty path parameter key")]
    EmptyPathParam { service: String },
    #[error("service {service} takes a path parameter but path '{path}' does not end with '/'")]
    PathParamWithoutSlash { service: String, path: String },
    #[error("logical service name {name} is registered more than once")]
    DuplicateName { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown message severity '{0}'")]
pub struct UnknownSeverity(pub String);
