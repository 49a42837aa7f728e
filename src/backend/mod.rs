//! In-process copier backend.
//!
//! Serves the copier API by talking to a source and a destination n8n
//! instance. The same service backs the `/api/*` JSON routes and, when the
//! front-end runs in the same process, the view controller directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{
    json_scalar, ApiError, CopierApi, CopyAction, CopyRequest, CopyResponse, DestinationStatus,
    WorkflowDetail, WorkflowSummary,
};
use crate::n8n::workflow::{clean_workflow, revision_notes, stamp_revision_history};
use crate::n8n::{N8nError, WorkflowInstance};
use crate::revision::revision_entry;

pub const DESTINATION_MISSING_MESSAGE: &str = "The workflow does not exist on the destination.";
pub const DEFAULT_REASON: &str = "No reason provided";

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct CopierService {
    source: Arc<dyn WorkflowInstance>,
    destination: Arc<dyn WorkflowInstance>,
    clock: Clock,
}

impl CopierService {
    pub fn new(source: Arc<dyn WorkflowInstance>, destination: Arc<dyn WorkflowInstance>) -> Self {
        Self::with_clock(source, destination, Arc::new(Utc::now))
    }

    pub fn with_clock(
        source: Arc<dyn WorkflowInstance>,
        destination: Arc<dyn WorkflowInstance>,
        clock: Clock,
    ) -> Self {
        Self {
            source,
            destination,
            clock,
        }
    }
}

fn upstream_error(prefix: &str, err: N8nError) -> ApiError {
    warn!("{}: {}", prefix, err);
    ApiError::internal(format!("{}: {}", prefix, err))
}

/// Copy failures carry the destination's response body when it sent one.
fn copy_error(err: N8nError) -> ApiError {
    let detail = match &err {
        N8nError::Status {
            body: Value::String(text),
            ..
        } => text.clone(),
        N8nError::Status { body, .. } => body.to_string(),
        other => other.to_string(),
    };
    warn!("Error copying workflow: {}", err);
    ApiError::internal(format!("Error copying workflow: {}", detail))
}

#[async_trait]
impl CopierApi for CopierService {
    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ApiError> {
        let data = self
            .source
            .list_active_workflows()
            .await
            .map_err(|e| upstream_error("Error fetching workflows from source", e))?;

        let Value::Array(items) = data else {
            return Err(ApiError::internal("API response 'data' key is not a list."));
        };

        let workflows: Vec<WorkflowSummary> = items
            .iter()
            .filter(|item| item.is_object())
            .map(|item| WorkflowSummary {
                id: json_scalar(item.get("id")).unwrap_or_default(),
                name: json_scalar(item.get("name")).unwrap_or_default(),
            })
            .collect();

        info!("Source lists {} active workflows", workflows.len());
        Ok(workflows)
    }

    async fn get_workflow(&self, id: &str) -> Result<WorkflowDetail, ApiError> {
        let original = self
            .source
            .get_workflow(id)
            .await
            .map_err(|e| upstream_error("Error fetching workflow details", e))?;
        let cleaned = clean_workflow(&original);
        Ok(WorkflowDetail { original, cleaned })
    }

    async fn check_destination(&self, id: &str) -> Result<DestinationStatus, ApiError> {
        let workflow = match self.destination.get_workflow(id).await {
            Ok(workflow) => workflow,
            Err(N8nError::NotFound(_)) => {
                return Ok(DestinationStatus::missing(DESTINATION_MISSING_MESSAGE))
            }
            Err(e) => return Err(upstream_error("Error checking destination workflow", e)),
        };

        let (notes, current_revision_content) = revision_notes(&workflow);
        Ok(DestinationStatus {
            exists: true,
            message: None,
            workflow_name: json_scalar(workflow.get("name")),
            workflow_id: Some(id.to_string()),
            special_notes: Some(notes),
            current_revision_content,
        })
    }

    async fn copy_workflow(&self, request: CopyRequest) -> Result<CopyResponse, ApiError> {
        let Some(mut workflow) = request.workflow.filter(|w| !is_empty_payload(w)) else {
            return Err(ApiError::BadRequest(
                "Missing 'workflow' in request body".to_string(),
            ));
        };
        let reason = request.reason.unwrap_or_else(|| DEFAULT_REASON.to_string());

        let entry = revision_entry(&(self.clock)(), &reason);
        if !stamp_revision_history(&mut workflow, &entry) {
            info!("Workflow has no revision history note, copying as is");
        }

        let (action, result) = match request.workflow_id.as_deref() {
            Some(id) if request.is_update && !id.is_empty() => {
                info!("Overwriting workflow {} on destination", id);
                (
                    CopyAction::Updated,
                    self.destination.update_workflow(id, &workflow).await,
                )
            }
            _ => {
                info!("Creating workflow on destination");
                (
                    CopyAction::Created,
                    self.destination.create_workflow(&workflow).await,
                )
            }
        };
        let written = result.map_err(copy_error)?;

        Ok(CopyResponse {
            success: true,
            message: Some(format!("Workflow {} successfully", action.as_str())),
            action,
            workflow: written,
        })
    }
}

fn is_empty_payload(workflow: &Value) -> bool {
    match workflow {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
