//! The copy flow state machine.
//!
//! `Initial -> WorkflowList -> Detail -> (confirmation) -> Copied`, with
//! `back`/`restart` resetting the session.
//!
//! Every network action is split in two: a synchronous `begin_*` step that
//! validates input and hands out a [`Ticket`], and a `finish_*` step that
//! applies the response. Tickets carry the session generation; a reset bumps
//! it so that responses issued before the reset are discarded.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use super::state::{Action, Confirmation, DetailScreen, ResultScreen, Screen, SessionState};
use crate::api::{
    ApiError, CopyRequest, CopyResponse, DestinationStatus, WorkflowDetail, WorkflowSummary,
};
use crate::revision;

pub const SELECT_WORKFLOW_MESSAGE: &str = "Please select a workflow first.";
pub const ENTER_REASON_MESSAGE: &str = "Please enter a deployment reason.";
pub const NOTHING_TO_COPY_MESSAGE: &str = "No workflow data available to copy.";
pub const OVERWRITE_PROMPT: &str = "Are you sure you want to OVERWRITE the existing workflow?\n\nThis will replace the entire workflow using PUT.\n\nClick OK to proceed or Cancel to go back.";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("A request is already in progress.")]
    Busy,

    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("The request was interrupted, please start over.")]
    Interrupted,

    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Proof that an action was started, needed to apply its response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    action: Action,
    generation: u64,
}

impl Ticket {
    pub fn action(&self) -> Action {
        self.action
    }
}

/// Outcome of applying a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// The session moved on since the ticket was issued; nothing changed.
    Stale,
}

/// What `begin_copy` decided.
#[derive(Debug)]
pub enum CopyStep {
    /// Send this request, then call `finish_copy` with the ticket.
    Send(Ticket, CopyRequest),
    /// The destination already has the workflow and the operator has not
    /// answered the overwrite prompt yet.
    NeedsConfirmation,
    /// The operator declined the overwrite.
    Declined,
}

#[derive(Clone, Debug)]
pub struct ViewController {
    session: SessionState,
    screen: Screen,
    error: Option<String>,
    in_flight: Option<Action>,
    awaiting_confirmation: bool,
    selection_draft: Option<String>,
    reason_draft: String,
    generation: u64,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            session: SessionState::default(),
            screen: Screen::Initial,
            error: None,
            in_flight: None,
            awaiting_confirmation: false,
            selection_draft: None,
            reason_draft: String::new(),
            generation: 0,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Message to show above the current screen, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> Option<Action> {
        self.in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn selection_draft(&self) -> Option<&str> {
        self.selection_draft.as_deref()
    }

    pub fn reason_draft(&self) -> &str {
        &self.reason_draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops everything collected so far and returns to the initial screen.
    ///
    /// Responses to actions started before the reset will be discarded.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new();
        self.generation = generation;
        debug!("Session reset, generation {}", generation);
    }

    fn start(&mut self, action: Action) -> Result<Ticket, ControllerError> {
        if let Some(current) = self.in_flight {
            debug!("Rejecting {:?} while {:?} is in flight", action, current);
            return Err(ControllerError::Busy);
        }
        self.in_flight = Some(action);
        self.error = None;
        Ok(Ticket {
            action,
            generation: self.generation,
        })
    }

    fn settle(&mut self, ticket: Ticket) -> Applied {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.action) {
            debug!(
                "Discarding stale {:?} response (generation {} != {})",
                ticket.action, ticket.generation, self.generation
            );
            return Applied::Stale;
        }
        self.in_flight = None;
        Applied::Applied
    }

    fn fail(&mut self, err: &ApiError) {
        self.error = Some(format!("Error: {}", err));
    }

    fn reject(&mut self, err: ControllerError) -> ControllerError {
        self.error = Some(err.to_string());
        err
    }

    // ========================================================================
    // Workflow list
    // ========================================================================

    pub fn begin_load_workflows(&mut self) -> Result<Ticket, ControllerError> {
        match self.screen {
            Screen::Initial | Screen::WorkflowList => {}
            _ => {
                return Err(ControllerError::InvalidState(
                    "The workflow list can only be fetched from the start screen.",
                ))
            }
        }
        let ticket = self.start(Action::LoadWorkflows)?;
        self.session.workflows.clear();
        Ok(ticket)
    }

    pub fn finish_load_workflows(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<WorkflowSummary>, ApiError>,
    ) -> Applied {
        if self.settle(ticket) == Applied::Stale {
            return Applied::Stale;
        }
        match result {
            Ok(workflows) => {
                info!("Loaded {} workflows", workflows.len());
                self.session.workflows = workflows;
                self.screen = Screen::WorkflowList;
            }
            Err(err) => self.fail(&err),
        }
        Applied::Applied
    }

    // ========================================================================
    // Detail + destination comparison
    // ========================================================================

    /// Validates the selection and reason and starts the detail fetch.
    ///
    /// Returns the ticket and the id of the workflow to fetch. Validation
    /// failures leave the screen unchanged and start nothing.
    pub fn begin_detail(
        &mut self,
        selection: Option<&str>,
        reason: &str,
    ) -> Result<(Ticket, String), ControllerError> {
        if self.screen != Screen::WorkflowList {
            return Err(ControllerError::InvalidState(
                "Fetch the workflow list before continuing.",
            ));
        }
        if self.in_flight.is_some() {
            return Err(ControllerError::Busy);
        }

        let selection = selection.map(str::trim).filter(|id| !id.is_empty());
        self.selection_draft = selection.map(str::to_string);
        self.reason_draft = reason.to_string();

        let Some(workflow_id) = selection.filter(|id| self.session.workflow_name(id).is_some())
        else {
            return Err(self.reject(ControllerError::Validation(SELECT_WORKFLOW_MESSAGE)));
        };
        let workflow_id = workflow_id.to_string();

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(self.reject(ControllerError::Validation(ENTER_REASON_MESSAGE)));
        }

        let ticket = self.start(Action::LoadDetail)?;
        self.session.deployment_reason = Some(reason.to_string());
        self.session.selected_workflow_id = Some(workflow_id.clone());
        Ok((ticket, workflow_id))
    }

    /// Applies the joined detail and destination responses.
    ///
    /// `now` stamps the projected revision note line.
    pub fn finish_detail(
        &mut self,
        ticket: Ticket,
        result: Result<(WorkflowDetail, DestinationStatus), ApiError>,
        now: DateTime<Utc>,
    ) -> Applied {
        if self.settle(ticket) == Applied::Stale {
            return Applied::Stale;
        }
        let (detail, destination) = match result {
            Ok(joined) => joined,
            Err(err) => {
                self.fail(&err);
                return Applied::Applied;
            }
        };

        let (Some(workflow_id), Some(reason)) = (
            self.session.selected_workflow_id.clone(),
            self.session.deployment_reason.clone(),
        ) else {
            self.error = Some(NOTHING_TO_COPY_MESSAGE.to_string());
            return Applied::Applied;
        };

        let projected_revision = if destination.exists && destination.has_revision_notes() {
            Some(revision::project(
                destination.current_revision_content.as_deref(),
                &reason,
                &now,
            ))
        } else {
            None
        };

        self.session.cleaned_workflow = Some(detail.cleaned.clone());
        self.session.exists_on_destination = destination.exists;
        let workflow_name = self
            .session
            .workflow_name(&workflow_id)
            .unwrap_or_default()
            .to_string();

        info!(
            "Showing workflow {} (exists on destination: {})",
            workflow_id, destination.exists
        );
        self.screen = Screen::Detail(DetailScreen {
            workflow_id,
            workflow_name,
            reason,
            original: detail.original,
            cleaned: detail.cleaned,
            destination,
            projected_revision,
        });
        Applied::Applied
    }

    // ========================================================================
    // Confirmation + copy
    // ========================================================================

    pub fn begin_copy(&mut self, answer: Confirmation) -> Result<CopyStep, ControllerError> {
        if !matches!(self.screen, Screen::Detail(_)) {
            return Err(ControllerError::InvalidState(NOTHING_TO_COPY_MESSAGE));
        }
        if self.in_flight.is_some() {
            return Err(ControllerError::Busy);
        }
        if !self.session.is_ready_to_copy() {
            return Err(self.reject(ControllerError::InvalidState(NOTHING_TO_COPY_MESSAGE)));
        }

        if self.session.exists_on_destination {
            match answer {
                Confirmation::Unanswered => {
                    self.awaiting_confirmation = true;
                    return Ok(CopyStep::NeedsConfirmation);
                }
                Confirmation::Declined => {
                    info!("Overwrite declined");
                    self.awaiting_confirmation = false;
                    return Ok(CopyStep::Declined);
                }
                Confirmation::Accepted => {}
            }
        }

        let ticket = self.start(Action::Copy)?;
        self.awaiting_confirmation = false;
        let request = CopyRequest {
            workflow: self.session.cleaned_workflow.clone(),
            workflow_id: self.session.selected_workflow_id.clone(),
            is_update: self.session.exists_on_destination,
            reason: self.session.deployment_reason.clone(),
        };
        Ok(CopyStep::Send(ticket, request))
    }

    pub fn finish_copy(&mut self, ticket: Ticket, result: Result<CopyResponse, ApiError>) -> Applied {
        if self.settle(ticket) == Applied::Stale {
            return Applied::Stale;
        }
        match result {
            Ok(response) => {
                info!(
                    "Workflow {} ({})",
                    response.action.as_str(),
                    response.workflow_id().unwrap_or_default()
                );
                self.screen = Screen::Copied(ResultScreen {
                    response,
                    reason: self.session.deployment_reason.clone().unwrap_or_default(),
                });
            }
            Err(err) => self.fail(&err),
        }
        Applied::Applied
    }
}
