//! JSON endpoints of the copier API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use super::state::GuardedCopierApi;
use crate::api::{
    ApiError, CopyRequest, CopyResponse, DestinationStatus, WorkflowDetail, WorkflowSummary,
};

async fn list_workflows(
    State(api): State<GuardedCopierApi>,
) -> Result<Json<Vec<WorkflowSummary>>, ApiError> {
    let workflows = api.list_workflows().await.inspect_err(|err| {
        warn!("Listing workflows failed: {}", err);
    })?;
    Ok(Json(workflows))
}

async fn get_workflow(
    State(api): State<GuardedCopierApi>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDetail>, ApiError> {
    let detail = api.get_workflow(&id).await.inspect_err(|err| {
        warn!("Fetching workflow {} failed: {}", id, err);
    })?;
    Ok(Json(detail))
}

async fn check_destination(
    State(api): State<GuardedCopierApi>,
    Path(id): Path<String>,
) -> Result<Json<DestinationStatus>, ApiError> {
    let status = api.check_destination(&id).await.inspect_err(|err| {
        warn!("Checking destination for {} failed: {}", id, err);
    })?;
    Ok(Json(status))
}

async fn copy_workflow(
    State(api): State<GuardedCopierApi>,
    body: Result<Json<CopyRequest>, JsonRejection>,
) -> Result<Json<CopyResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let workflow_id = request.workflow_id.clone();

    let response = api.copy_workflow(request).await.inspect_err(|err| {
        warn!("Copying workflow {:?} failed: {}", workflow_id, err);
    })?;
    info!(
        "Workflow {:?} {} on destination",
        workflow_id,
        response.action.as_str()
    );
    Ok(Json(response))
}

/// Routes to be nested under `/api`.
pub fn make_api_routes(api: GuardedCopierApi) -> Router {
    Router::new()
        .route("/workflows", get(list_workflows))
        .route("/workflow/{id}", get(get_workflow))
        .route("/check-destination/{id}", get(check_destination))
        .route("/copy-workflow", post(copy_workflow))
        .with_state(api)
}
