use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Read-style requests carry their payload in the query string.
    pub fn is_read(self) -> bool {
        matches!(self, HttpMethod::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one logical server operation is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_param: Option<String>,
}

impl ServiceDescriptor {
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method: HttpMethod::Get,
            path_param: None,
        }
    }

    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method: HttpMethod::Post,
            path_param: None,
        }
    }

    pub fn with_path_param(mut self, key: impl Into<String>) -> Self {
        self.path_param = Some(key.into());
        self
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName {
                path: self.path.clone(),
            });
        }
        if self.path.trim().is_empty() {
            return Err(DescriptorError::EmptyPath {
                service: self.name.clone(),
            });
        }
        if self.path.starts_with('/') {
            return Err(DescriptorError::AbsolutePath {
                service: self.name.clone(),
                path: self.path.clone(),
            });
        }
        if let Some(key) = &self.path_param {
            if key.trim().is_empty() {
                return Err(DescriptorError::EmptyPathParam {
                    service: self.name.clone(),
                });
            }
            if !self.path.ends_with('/') {
                return Err(DescriptorError::PathParamWithoutSlash {
                    service: self.name.clone(),
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }
}
