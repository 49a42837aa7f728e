mod file_config;

pub use file_config::{FileConfig, InstanceConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub backend_url: Option<String>,
    pub source_url: Option<String>,
    pub source_api_key: Option<String>,
    pub destination_url: Option<String>,
    pub destination_api_key: Option<String>,
    pub request_timeout_sec: u64,
    pub session_ttl_sec: u64,
}

/// Where an n8n instance lives and how to authenticate with it.
#[derive(Clone, PartialEq, Eq)]
pub struct N8nSettings {
    pub url: String,
    pub api_key: String,
}

impl std::fmt::Debug for N8nSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("N8nSettings")
            .field("url", &self.url)
            .field("api_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePair {
    pub source: N8nSettings,
    pub destination: N8nSettings,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub request_timeout_sec: u64,
    pub session_ttl_sec: u64,

    /// Remote copier API the web pages talk to. When unset the pages use the
    /// in-process backend.
    pub backend_url: Option<String>,

    /// n8n instances served by the in-process backend. When set the `/api`
    /// endpoints are exposed.
    pub instances: Option<InstancePair>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }
        let session_ttl_sec = file.session_ttl_sec.unwrap_or(cli.session_ttl_sec);
        if session_ttl_sec == 0 {
            bail!("session_ttl_sec must be greater than zero");
        }

        let backend_url = file
            .backend_url
            .or_else(|| cli.backend_url.clone())
            .filter(|url| !url.trim().is_empty());

        let source_file = file.source.unwrap_or_default();
        let destination_file = file.destination.unwrap_or_default();
        let source = resolve_instance(
            "source",
            source_file.url.or_else(|| cli.source_url.clone()),
            source_file.api_key.or_else(|| cli.source_api_key.clone()),
        )?;
        let destination = resolve_instance(
            "destination",
            destination_file.url.or_else(|| cli.destination_url.clone()),
            destination_file
                .api_key
                .or_else(|| cli.destination_api_key.clone()),
        )?;

        let instances = match (source, destination) {
            (Some(source), Some(destination)) => Some(InstancePair {
                source,
                destination,
            }),
            (None, None) => None,
            (Some(_), None) => bail!("The destination n8n instance is not configured"),
            (None, Some(_)) => bail!("The source n8n instance is not configured"),
        };

        if instances.is_none() && backend_url.is_none() {
            bail!(
                "Either both n8n instances (--source-url/--destination-url and their API keys) \
                 or --backend-url must be configured"
            );
        }

        Ok(Self {
            port,
            logging_level,
            request_timeout_sec,
            session_ttl_sec,
            backend_url,
            instances,
        })
    }
}

fn resolve_instance(
    name: &str,
    url: Option<String>,
    api_key: Option<String>,
) -> Result<Option<N8nSettings>> {
    let url = url.filter(|url| !url.trim().is_empty());
    let api_key = api_key.filter(|key| !key.is_empty());
    match (url, api_key) {
        (Some(url), Some(api_key)) => Ok(Some(N8nSettings { url, api_key })),
        (None, None) => Ok(None),
        (Some(_), None) => bail!("The {} n8n instance has a URL but no API key", name),
        (None, Some(_)) => bail!("The {} n8n instance has an API key but no URL", name),
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
