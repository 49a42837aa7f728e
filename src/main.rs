use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use workflow_copier::backend::Clock;
use workflow_copier::config::{AppConfig, CliConfig, FileConfig};
use workflow_copier::server::ServerConfig;
use workflow_copier::{
    run_server, CopierApi, CopierService, HttpCopierApi, N8nClient, RequestsLoggingLevel,
};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// URL of a remote copier backend to drive the web pages with, instead of
    /// the in-process one.
    #[clap(long, env = "COPIER_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Base URL of the source n8n instance.
    #[clap(long, env = "SOURCE_N8N_URL")]
    pub source_url: Option<String>,

    /// API key of the source n8n instance.
    #[clap(long, env = "SOURCE_API_KEY", hide_env_values = true)]
    pub source_api_key: Option<String>,

    /// Base URL of the destination n8n instance.
    #[clap(long, env = "DESTINATION_N8N_URL")]
    pub destination_url: Option<String>,

    /// API key of the destination n8n instance.
    #[clap(long, env = "DESTINATION_API_KEY", hide_env_values = true)]
    pub destination_api_key: Option<String>,

    /// Timeout in seconds for requests to n8n or to the remote backend.
    #[clap(long, default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Seconds of inactivity after which a browser session is dropped.
    #[clap(long, default_value_t = 3600)]
    pub session_ttl_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            logging_level: self.logging_level.clone(),
            backend_url: self.backend_url.clone(),
            source_url: self.source_url.clone(),
            source_api_key: self.source_api_key.clone(),
            destination_url: self.destination_url.clone(),
            destination_api_key: self.destination_api_key.clone(),
            request_timeout_sec: self.request_timeout_sec,
            session_ttl_sec: self.session_ttl_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before parsing so that clap sees the variables.
    let dotenv = dotenvy::dotenv();
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    match dotenv {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("Could not load .env file: {}", err),
    }

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let backend: Option<Arc<dyn CopierApi>> = match &config.instances {
        Some(instances) => {
            info!(
                "Copying from {} to {}",
                instances.source.url, instances.destination.url
            );
            let source = N8nClient::new(
                instances.source.url.clone(),
                instances.source.api_key.clone(),
                config.request_timeout_sec,
            )
            .context("Failed to create source n8n client")?;
            let destination = N8nClient::new(
                instances.destination.url.clone(),
                instances.destination.api_key.clone(),
                config.request_timeout_sec,
            )
            .context("Failed to create destination n8n client")?;
            let service = CopierService::new(Arc::new(source), Arc::new(destination));
            Some(Arc::new(service) as Arc<dyn CopierApi>)
        }
        None => None,
    };

    let ui_api: Arc<dyn CopierApi> = match (&config.backend_url, &backend) {
        (Some(url), _) => {
            info!("Web pages use the remote backend at {}", url);
            Arc::new(
                HttpCopierApi::new(url.clone(), config.request_timeout_sec)
                    .context("Failed to create backend client")?,
            )
        }
        (None, Some(backend)) => backend.clone(),
        (None, None) => anyhow::bail!("No copier backend configured"),
    };

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        session_ttl_sec: config.session_ttl_sec,
    };
    let clock: Clock = Arc::new(chrono::Utc::now);

    info!("Starting server on port {}...", config.port);
    run_server(server_config, ui_api, backend, clock).await
}
