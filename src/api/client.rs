//! HTTP client for a remotely hosted copier backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    ApiError, CopierApi, CopyRequest, CopyResponse, DestinationStatus, WorkflowDetail,
    WorkflowSummary, COPY_FAILED_MESSAGE, DESTINATION_FAILED_MESSAGE, DETAIL_FAILED_MESSAGE,
    LIST_FAILED_MESSAGE,
};

pub struct HttpCopierApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCopierApi {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "http://localhost:8000")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Copier backend request failed: {}", e);
            ApiError::Transport(format!("Could not reach the copier backend: {}", e))
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            debug!("Copier backend answered {} ({} bytes)", status, body.len());
            return Err(ApiError::from_response_body(
                status.as_u16(),
                &body,
                fallback,
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Decode(format!("Unexpected response from backend: {}", e)))
    }
}

#[async_trait]
impl CopierApi for HttpCopierApi {
    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ApiError> {
        let url = format!("{}/api/workflows", self.base_url);
        self.read(self.client.get(&url), LIST_FAILED_MESSAGE).await
    }

    async fn get_workflow(&self, id: &str) -> Result<WorkflowDetail, ApiError> {
        let url = format!("{}/api/workflow/{}", self.base_url, urlencoding::encode(id));
        self.read(self.client.get(&url), DETAIL_FAILED_MESSAGE)
            .await
    }

    async fn check_destination(&self, id: &str) -> Result<DestinationStatus, ApiError> {
        let url = format!(
            "{}/api/check-destination/{}",
            self.base_url,
            urlencoding::encode(id)
        );
        self.read(self.client.get(&url), DESTINATION_FAILED_MESSAGE)
            .await
    }

    async fn copy_workflow(&self, request: CopyRequest) -> Result<CopyResponse, ApiError> {
        let url = format!("{}/api/copy-workflow", self.base_url);
        self.read(self.client.post(&url).json(&request), COPY_FAILED_MESSAGE)
            .await
    }
}
