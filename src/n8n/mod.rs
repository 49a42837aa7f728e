//! Access to n8n instances through their public REST API.

mod client;
pub mod workflow;

pub use client::N8nClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Header n8n expects the API key in.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

#[derive(Debug, Error)]
pub enum N8nError {
    #[error("workflow {0} not found")]
    NotFound(String),

    /// Non-success response. `body` holds the parsed JSON body when there was
    /// one, or the raw text wrapped in a JSON string.
    #[error("{status} response from n8n: {body}")]
    Status { status: u16, body: Value },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

/// One n8n instance, either the source or the destination of a copy.
#[async_trait]
pub trait WorkflowInstance: Send + Sync {
    /// Active workflows without pinned data, as the raw `data` value of the
    /// listing response.
    async fn list_active_workflows(&self) -> Result<Value, N8nError>;

    async fn get_workflow(&self, id: &str) -> Result<Value, N8nError>;

    async fn create_workflow(&self, workflow: &Value) -> Result<Value, N8nError>;

    async fn update_workflow(&self, id: &str, workflow: &Value) -> Result<Value, N8nError>;
}
