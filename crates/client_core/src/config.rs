use std::{collections::BTreeMap, fmt, fs, io::ErrorKind, path::Path, str::FromStr};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "formclient.toml";

/// How logical services are addressed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// `rest_root + descriptor.path`, method from the descriptor.
    #[default]
    Rest,
    /// Everything is posted to the gateway with the service name in a header.
    Named,
}

impl FromStr for DispatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(DispatchMode::Rest),
            "named" => Ok(DispatchMode::Named),
            other => Err(anyhow!("unknown dispatch mode '{other}' (expected rest or named)")),
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Rest => f.write_str("rest"),
            DispatchMode::Named => f.write_str("named"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub server_url: String,
    pub rest_root: String,
    pub mode: DispatchMode,
    pub gateway_path: String,
    pub file_path: String,
    pub logout_path: String,
    pub max_upload_bytes: u64,
    pub request_timeout_secs: u64,
    pub log_filter: String,
    /// Endpoint path overrides keyed by service key (`getOwner = "owners/id/"`).
    pub service_paths: BTreeMap<String, String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080/".into(),
            rest_root: "rest/".into(),
            mode: DispatchMode::Rest,
            gateway_path: "a._s".into(),
            file_path: "a._f".into(),
            logout_path: "a._o".into(),
            max_upload_bytes: 5 * 1024 * 1024,
            request_timeout_secs: 30,
            log_filter: "info".into(),
            service_paths: BTreeMap::new(),
        }
    }
}

/// Loads `formclient.toml` from the working directory, then the environment.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<ClientSettings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => ClientSettings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> anyhow::Result<ClientSettings> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__REST_ROOT") {
        settings.rest_root = v;
    }
    if let Some(v) = lookup("APP__MODE") {
        settings.mode = v.parse()?;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
