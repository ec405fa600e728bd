use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{self, ClientSettings},
    transport::DEFAULT_MIME_TYPE,
    DispatchError, Dispatcher, FileUpload, HttpTransport, Service, Transport,
};
use serde_json::Value;
use shared::protocol::{Payload, UploadedFile};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Calls pet clinic and nomination services from the command line")]
struct Cli {
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides `server_url` from the settings file.
    #[arg(long)]
    server_url: Option<String>,
    /// `rest` or `named`.
    #[arg(long)]
    mode: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the service table in effect.
    Services,
    /// Calls one service with `key=value` fields.
    Call {
        service: String,
        fields: Vec<String>,
    },
    Upload {
        path: PathBuf,
    },
    Download {
        key: String,
        name: String,
        out: PathBuf,
        #[arg(long, default_value = DEFAULT_MIME_TYPE)]
        mime_type: String,
    },
    Logout,
}

fn parse_fields(fields: &[String]) -> Result<Payload> {
    let mut payload = Payload::new();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("expected key=value, got '{field}'");
        };
        payload.insert(key.trim(), value);
    }
    Ok(payload)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings: ClientSettings = config::load_settings_from(&cli.config)?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(mode) = &cli.mode {
        settings.mode = mode.parse()?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let transport = Arc::new(HttpTransport::new(&settings).context("failed to build http client")?);
    let dispatcher = Dispatcher::from_settings(transport.clone(), &settings)?;
    info!(server = %transport.base_url(), mode = %settings.mode, "formctl ready");

    match cli.command {
        Command::Services => {
            for (service, descriptor) in dispatcher.registry().iter() {
                let param = descriptor
                    .path_param
                    .as_deref()
                    .map(|key| format!(" <{key}>"))
                    .unwrap_or_default();
                println!(
                    "{:<22} {:<5} {}{}  ({})",
                    service.key(),
                    descriptor.method.as_str(),
                    descriptor.path,
                    param,
                    descriptor.name
                );
            }
        }
        Command::Call { service, fields } => {
            let service: Service = service.parse()?;
            let payload = parse_fields(&fields)?;
            match dispatcher.call(service, payload).await {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&Value::Object(response.data))?);
                }
                Err(DispatchError::Rejected { service, messages }) => {
                    for message in &messages {
                        match &message.field_name {
                            Some(field) => eprintln!("{} {field}: {}", message.severity, message.text),
                            None => eprintln!("{} {}", message.severity, message.text),
                        }
                    }
                    bail!("{service} rejected the request");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Upload { path } => {
            let file = FileUpload::from_path(&path)
                .await
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            if file.size() > settings.max_upload_bytes {
                bail!(
                    "'{}' is {} bytes; the limit is {}",
                    path.display(),
                    file.size(),
                    settings.max_upload_bytes
                );
            }
            let (name, mime_type, size) = (file.name.clone(), file.mime_type.clone(), file.size());
            let key = transport.upload_file(file).await?;
            let uploaded = UploadedFile {
                key,
                name,
                mime_type,
                size,
            };
            println!("{}", serde_json::to_string_pretty(&uploaded)?);
        }
        Command::Download {
            key,
            name,
            out,
            mime_type,
        } => {
            let bytes = transport.download_file(&key, &name, &mime_type).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("failed to write '{}'", out.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), out.display());
        }
        Command::Logout => {
            transport.logout().await?;
            println!("logged out");
        }
    }

    Ok(())
}
