//! Wire-level collaborator behind the dispatcher: service calls, attachments, logout.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use shared::{
    domain::HttpMethod,
    protocol::{Payload, ServiceResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::ClientSettings, error::TransportError};

pub const SERVICE_NAME_HEADER: &str = "_serviceName";
pub const FILE_NAME_HEADER: &str = "_fileName";
pub const MIME_TYPE_HEADER: &str = "_mimeType";
pub const FILE_TOKEN_HEADER: &str = "_fileToken";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A fully resolved request. `url` is relative to the server base.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub url: String,
    pub service_name: Option<String>,
    pub body: Option<Payload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "_noName".to_string());
        let mime_type = guess_mime_type(&name).to_string();
        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }
}

fn guess_mime_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Every call ends in exactly one `Ok` or `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: WireRequest) -> Result<ServiceResponse, TransportError>;
    /// Returns the token the server assigned to the stored file.
    async fn upload_file(&self, file: FileUpload) -> Result<String, TransportError>;
    async fn download_file(
        &self,
        key: &str,
        name: &str,
        mime_type: &str,
    ) -> Result<Vec<u8>, TransportError>;
    async fn logout(&self) -> Result<(), TransportError>;
}

pub struct HttpTransport {
    http: Client,
    base: Url,
    file_path: String,
    logout_path: String,
}

#[derive(Debug, Deserialize)]
struct FileTokenResponse {
    #[serde(rename = "_fileToken")]
    token: String,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Self::with_client(http, settings)
    }

    pub fn with_client(http: Client, settings: &ClientSettings) -> Result<Self, TransportError> {
        let mut raw = settings.server_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|source| TransportError::Url {
            url: raw.clone(),
            source,
        })?;
        Ok(Self {
            http,
            base,
            file_path: settings.file_path.clone(),
            logout_path: settings.logout_path.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, relative: &str) -> Result<Url, TransportError> {
        self.base
            .join(relative)
            .map_err(|source| TransportError::Url {
                url: relative.to_string(),
                source,
            })
    }

    fn request(&self, method: HttpMethod, url: Url) -> RequestBuilder {
        match method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
        }
    }
}

fn decode_envelope(
    status: StatusCode,
    url: &Url,
    bytes: &[u8],
) -> Result<ServiceResponse, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        if status.is_success() {
            return Ok(ServiceResponse::default());
        }
        return Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    match serde_json::from_slice::<ServiceResponse>(bytes) {
        Ok(response) if status.is_success() || response.is_error() => Ok(response),
        Ok(_) => Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }),
        Err(_) if !status.is_success() => Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }),
        Err(source) => Err(TransportError::Decode {
            url: url.to_string(),
            source,
        }),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, request: WireRequest) -> Result<ServiceResponse, TransportError> {
        let url = self.resolve(&request.url)?;
        let mut builder = self.request(request.method, url.clone());
        if let Some(name) = &request.service_name {
            builder = builder.header(SERVICE_NAME_HEADER, name);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "service call returned non-success status");
        }
        decode_envelope(status, &url, &bytes)
    }

    async fn upload_file(&self, file: FileUpload) -> Result<String, TransportError> {
        let url = self.resolve(&self.file_path)?;
        debug!(url = %url, name = %file.name, size = file.size(), "uploading file");
        let FileUpload {
            name,
            mime_type,
            bytes,
        } = file;
        let text = self
            .http
            .post(url)
            .header(FILE_NAME_HEADER, name.as_str())
            .header(MIME_TYPE_HEADER, mime_type.as_str())
            .body(bytes)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let token = match serde_json::from_str::<FileTokenResponse>(&text) {
            Ok(parsed) => parsed.token,
            Err(_) => text.trim().to_string(),
        };
        if token.is_empty() {
            return Err(TransportError::EmptyToken { name });
        }
        Ok(token)
    }

    async fn download_file(
        &self,
        key: &str,
        name: &str,
        mime_type: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.resolve(&self.file_path)?;
        debug!(url = %url, key, "downloading file");
        let bytes = self
            .http
            .get(url)
            .header(FILE_TOKEN_HEADER, key)
            .header(FILE_NAME_HEADER, name)
            .header(MIME_TYPE_HEADER, mime_type)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    async fn logout(&self) -> Result<(), TransportError> {
        let url = self.resolve(&self.logout_path)?;
        self.http.post(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
