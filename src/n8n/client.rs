//! HTTP client for the n8n public API (`/api/v1`).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{N8nError, WorkflowInstance, API_KEY_HEADER};

pub struct N8nClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl N8nClient {
    /// Create a new n8n client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the instance (e.g., "https://n8n.example.com")
    /// * `api_key` - Public API key of the instance
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, api_key: String, timeout_sec: u64) -> Result<Self, N8nError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| N8nError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn workflow_url(&self, id: &str) -> String {
        format!(
            "{}/api/v1/workflows/{}",
            self.base_url,
            urlencoding::encode(id)
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder, id: Option<&str>) -> Result<Value, N8nError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| N8nError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(N8nError::NotFound(id.to_string()));
            }
        }

        let text = response
            .text()
            .await
            .map_err(|e| N8nError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            debug!("n8n at {} answered {}", self.base_url, status);
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(N8nError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| N8nError::Decode(format!("Invalid JSON from n8n: {}", e)))
    }
}

#[async_trait]
impl WorkflowInstance for N8nClient {
    async fn list_active_workflows(&self) -> Result<Value, N8nError> {
        let url = format!(
            "{}/api/v1/workflows?active=true&excludePinnedData=true",
            self.base_url
        );
        let mut listing = self.send(self.client.get(&url), None).await?;
        Ok(listing
            .get_mut("data")
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }

    async fn get_workflow(&self, id: &str) -> Result<Value, N8nError> {
        let url = self.workflow_url(id);
        self.send(self.client.get(&url), Some(id)).await
    }

    async fn create_workflow(&self, workflow: &Value) -> Result<Value, N8nError> {
        let url = format!("{}/api/v1/workflows", self.base_url);
        self.send(self.client.post(&url).json(workflow), None).await
    }

    async fn update_workflow(&self, id: &str, workflow: &Value) -> Result<Value, N8nError> {
        let url = self.workflow_url(id);
        // A 404 on PUT is reported as a plain failure, not as "missing".
        self.send(self.client.put(&url).json(workflow), None).await
    }
}
