use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub backend_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub session_ttl_sec: Option<u64>,

    // n8n instances
    pub source: Option<InstanceConfig>,
    pub destination: Option<InstanceConfig>,
}

/// `[source]` / `[destination]` tables.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct InstanceConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
