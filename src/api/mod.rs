//! Copier API: the four endpoints the view controller depends on.
//!
//! `CopierApi` is the seam between the controller and whatever serves the
//! endpoints: the in-process [`crate::backend::CopierService`] or a remote
//! backend reached through [`HttpCopierApi`].

mod client;
mod error;
pub mod models;

pub use client::HttpCopierApi;
pub use error::ApiError;
pub use models::*;

use async_trait::async_trait;

pub const LIST_FAILED_MESSAGE: &str = "Failed to fetch workflows.";
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to fetch workflow details.";
pub const DESTINATION_FAILED_MESSAGE: &str = "Failed to check destination workflow.";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy workflow.";

#[async_trait]
pub trait CopierApi: Send + Sync {
    /// `GET /api/workflows`
    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ApiError>;

    /// `GET /api/workflow/{id}`
    async fn get_workflow(&self, id: &str) -> Result<WorkflowDetail, ApiError>;

    /// `GET /api/check-destination/{id}`
    async fn check_destination(&self, id: &str) -> Result<DestinationStatus, ApiError>;

    /// `POST /api/copy-workflow`
    async fn copy_workflow(&self, request: CopyRequest) -> Result<CopyResponse, ApiError>;
}
