use shared::protocol::Message;
use thiserror::Error;

use crate::nomination::validation::ValidationFailure;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },
    #[error("invalid url '{url}': {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[error("file endpoint returned no token for {name}")]
    EmptyToken { name: String },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Caller or registry misconfiguration; nothing was sent.
    #[error("Client design error: value for field {key} is missing from payload")]
    MissingPathParam { service: String, key: String },
    #[error("service {service} was rejected with {} message(s)", messages.len())]
    Rejected {
        service: String,
        messages: Vec<Message>,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DispatchError {
    pub fn messages(&self) -> &[Message] {
        match self {
            DispatchError::Rejected { messages, .. } => messages,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown service key '{0}'")]
pub struct UnknownService(pub String);

#[derive(Debug, Error)]
pub enum NominationError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("File is too large to upload. Please limit it to 5MB only")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("category {category} allows at most {limit} member(s)")]
    MemberLimit { category: String, limit: usize },
    #[error("no row at index {0}")]
    NoSuchRow(usize),
    #[error("the form is read-only in the current view")]
    ReadOnly,
    #[error("only a nomination opened from a listing can be updated")]
    NotListed,
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to encode or decode nomination data: {0}")]
    Encoding(#[from] serde_json::Error),
}
