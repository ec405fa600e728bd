use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::ServiceResponse;

use crate::{
    dispatcher::Dispatcher,
    error::TransportError,
    registry::ServiceRegistry,
    transport::{FileUpload, Transport, WireRequest},
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Exchange(WireRequest),
    Upload { name: String, size: u64 },
    Download { key: String, name: String },
    Logout,
}

/// In-process transport that records every call and answers from a queue.
pub(crate) struct RecordingTransport {
    events: Mutex<Vec<Event>>,
    responses: Mutex<VecDeque<Result<ServiceResponse, TransportError>>>,
    upload_token: String,
    fail_uploads: bool,
    download_bytes: Vec<u8>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            upload_token: "file-token-1".to_string(),
            fail_uploads: false,
            download_bytes: b"attachment".to_vec(),
        }
    }

    pub(crate) fn respond(self, response: ServiceResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub(crate) fn respond_json(self, data: Value) -> Self {
        self.respond(ok_with(data))
    }

    pub(crate) fn fail_next(self, err: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn with_upload_token(mut self, token: &str) -> Self {
        self.upload_token = token.to_string();
        self
    }

    pub(crate) fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn requests(&self) -> Vec<WireRequest> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Exchange(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn exchange(&self, request: WireRequest) -> Result<ServiceResponse, TransportError> {
        self.record(Event::Exchange(request));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ServiceResponse::default()))
    }

    async fn upload_file(&self, file: FileUpload) -> Result<String, TransportError> {
        self.record(Event::Upload {
            name: file.name.clone(),
            size: file.size(),
        });
        if self.fail_uploads {
            return Err(TransportError::Status {
                status: 500,
                url: "a._f".to_string(),
            });
        }
        Ok(self.upload_token.clone())
    }

    async fn download_file(
        &self,
        key: &str,
        name: &str,
        _mime_type: &str,
    ) -> Result<Vec<u8>, TransportError> {
        self.record(Event::Download {
            key: key.to_string(),
            name: name.to_string(),
        });
        Ok(self.download_bytes.clone())
    }

    async fn logout(&self) -> Result<(), TransportError> {
        self.record(Event::Logout);
        Ok(())
    }
}

pub(crate) fn ok_with(data: Value) -> ServiceResponse {
    match data {
        Value::Object(map) => ServiceResponse::ok(map),
        other => panic!("response data must be an object, got {other}"),
    }
}

pub(crate) fn dispatcher_over(transport: &Arc<RecordingTransport>) -> Dispatcher {
    Dispatcher::new(transport.clone(), ServiceRegistry::standard())
}
