//! Session state and the screens of the copy flow.

use serde_json::Value;

use crate::api::{CopyResponse, DestinationStatus, WorkflowSummary};

/// Data collected while the operator walks through the flow.
///
/// Only the controller mutates it; a reset replaces it with the default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub workflows: Vec<WorkflowSummary>,
    pub selected_workflow_id: Option<String>,
    pub cleaned_workflow: Option<Value>,
    pub deployment_reason: Option<String>,
    pub exists_on_destination: bool,
}

impl SessionState {
    pub fn workflow_name(&self, id: &str) -> Option<&str> {
        self.workflows
            .iter()
            .find(|wf| wf.id == id)
            .map(|wf| wf.name.as_str())
    }

    /// True once everything a copy needs has been collected.
    pub fn is_ready_to_copy(&self) -> bool {
        self.selected_workflow_id.is_some()
            && self
                .deployment_reason
                .as_deref()
                .is_some_and(|reason| !reason.trim().is_empty())
            && self.cleaned_workflow.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    /// Nothing fetched yet.
    Initial,
    /// Workflow list fetched, possibly empty.
    WorkflowList,
    Detail(DetailScreen),
    Copied(ResultScreen),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Initial => "initial",
            Screen::WorkflowList => "list",
            Screen::Detail(_) => "detail",
            Screen::Copied(_) => "copied",
        }
    }
}

/// Everything the detail screen shows.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailScreen {
    pub workflow_id: String,
    pub workflow_name: String,
    pub reason: String,
    pub original: Value,
    pub cleaned: Value,
    pub destination: DestinationStatus,
    /// Revision note content after the deployment. Only computed when the
    /// destination has a revision note.
    pub projected_revision: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultScreen {
    pub response: CopyResponse,
    pub reason: String,
}

/// Network actions the controller can have in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    LoadWorkflows,
    LoadDetail,
    Copy,
}

/// Operator's answer to the overwrite confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Confirmation {
    #[default]
    Unanswered,
    Accepted,
    Declined,
}
