//! Turns a service descriptor plus payload into one wire request and awaits its outcome.

use std::sync::Arc;

use anyhow::Context;
use shared::{
    domain::{HttpMethod, ServiceDescriptor},
    protocol::{scalar_text, Payload, ServiceResponse},
};
use tracing::{debug, info, warn};

use crate::{
    config::{ClientSettings, DispatchMode},
    error::DispatchError,
    registry::{Service, ServiceRegistry},
    transport::{Transport, WireRequest},
};

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    registry: ServiceRegistry,
    mode: DispatchMode,
    rest_root: String,
    gateway_path: String,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, registry: ServiceRegistry) -> Self {
        let defaults = ClientSettings::default();
        Self {
            transport,
            registry,
            mode: defaults.mode,
            rest_root: defaults.rest_root,
            gateway_path: defaults.gateway_path,
        }
    }

    /// Builds the standard registry with the configured path overrides and validates it.
    pub fn from_settings(
        transport: Arc<dyn Transport>,
        settings: &ClientSettings,
    ) -> anyhow::Result<Self> {
        let mut registry = ServiceRegistry::standard();
        registry
            .apply_path_overrides(&settings.service_paths)
            .context("invalid service path override")?;
        registry
            .validate()
            .context("service registry failed validation")?;
        Ok(Self {
            transport,
            registry,
            mode: settings.mode,
            rest_root: settings.rest_root.clone(),
            gateway_path: settings.gateway_path.clone(),
        })
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rest_root(mut self, rest_root: impl Into<String>) -> Self {
        self.rest_root = rest_root.into();
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Resolves the wire request without touching the transport.
    pub fn prepare(
        &self,
        descriptor: &ServiceDescriptor,
        mut payload: Payload,
    ) -> Result<WireRequest, DispatchError> {
        if self.mode == DispatchMode::Named {
            return Ok(WireRequest {
                method: HttpMethod::Post,
                url: self.gateway_path.clone(),
                service_name: Some(descriptor.name.clone()),
                body: Some(payload),
            });
        }

        let mut url = format!("{}{}", self.rest_root, descriptor.path);
        if let Some(key) = &descriptor.path_param {
            let Some(value) = payload.text(key) else {
                return Err(DispatchError::MissingPathParam {
                    service: descriptor.name.clone(),
                    key: key.clone(),
                });
            };
            url.push_str(&urlencoding::encode(&value));
            payload.remove(key);
        }

        if descriptor.method.is_read() {
            url.push_str(&query_string(&payload));
            return Ok(WireRequest {
                method: descriptor.method,
                url,
                service_name: None,
                body: None,
            });
        }

        Ok(WireRequest {
            method: descriptor.method,
            url,
            service_name: None,
            body: Some(payload),
        })
    }

    pub async fn send(
        &self,
        descriptor: &ServiceDescriptor,
        payload: Payload,
    ) -> Result<ServiceResponse, DispatchError> {
        let request = match self.prepare(descriptor, payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(service = %descriptor.name, error = %err, "request aborted before dispatch");
                return Err(err);
            }
        };
        info!(url = %request.url, method = %request.method, service = %descriptor.name, "dispatching");

        let response = self.transport.exchange(request).await?;
        if response.is_error() {
            debug!(
                service = %descriptor.name,
                messages = response.messages.len(),
                "server rejected request"
            );
            return Err(DispatchError::Rejected {
                service: descriptor.name.clone(),
                messages: response.messages,
            });
        }
        Ok(response)
    }

    pub async fn call(
        &self,
        service: Service,
        payload: Payload,
    ) -> Result<ServiceResponse, DispatchError> {
        let descriptor = self.registry.get(service).clone();
        self.send(&descriptor, payload).await
    }
}

/// `?k=v&k2=v2` in payload order with URL-encoded values; empty for an empty payload.
pub fn query_string(payload: &Payload) -> String {
    let mut query = String::new();
    for (key, value) in payload.iter() {
        query.push(if query.is_empty() { '?' } else { '&' });
        query.push_str(key);
        query.push('=');
        query.push_str(&urlencoding::encode(&scalar_text(value)));
    }
    query
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
