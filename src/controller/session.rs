use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::state::Confirmation;
use super::view_controller::{Applied, ControllerError, CopyStep, ViewController};
use crate::api::{ApiError, CopierApi};
use crate::backend::Clock;

/// Drives a [`ViewController`] against a [`CopierApi`].
///
/// The controller lock is only taken for the synchronous begin/finish steps,
/// never across a request.
#[derive(Clone)]
pub struct SessionHandle {
    controller: Arc<Mutex<ViewController>>,
    api: Arc<dyn CopierApi>,
    clock: Clock,
}

impl SessionHandle {
    pub fn new(api: Arc<dyn CopierApi>, clock: Clock) -> Self {
        Self {
            controller: Arc::new(Mutex::new(ViewController::new())),
            api,
            clock,
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut ViewController) -> R) -> R {
        let mut controller = self.controller.lock().unwrap();
        f(&mut controller)
    }

    /// Copy of the controller, for rendering.
    pub fn snapshot(&self) -> ViewController {
        self.with(|controller| controller.clone())
    }

    /// Runs the network half of an action on its own task.
    ///
    /// The task owns the finish step, so the ticket is settled even when the
    /// caller is dropped mid-request (a browser leaving the page cancels its
    /// handler).
    async fn detach<F>(&self, step: F) -> Result<Applied, ControllerError>
    where
        F: Future<Output = Result<Applied, ControllerError>> + Send + 'static,
    {
        match tokio::spawn(step).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Session request task failed: {}", err);
                self.restart();
                Err(ControllerError::Interrupted)
            }
        }
    }

    pub async fn load_workflows(&self) -> Result<Applied, ControllerError> {
        let ticket = self.with(|controller| controller.begin_load_workflows())?;

        let session = self.clone();
        self.detach(async move {
            let result = session.api.list_workflows().await;
            let failure = result.as_ref().err().cloned();

            let applied =
                session.with(|controller| controller.finish_load_workflows(ticket, result));
            surface(applied, failure)
        })
        .await
    }

    /// Validates the form, then fetches the detail and destination status
    /// together.
    pub async fn continue_to_detail(
        &self,
        selection: Option<&str>,
        reason: &str,
    ) -> Result<Applied, ControllerError> {
        let (ticket, workflow_id) =
            self.with(|controller| controller.begin_detail(selection, reason))?;

        let session = self.clone();
        self.detach(async move {
            let result = tokio::try_join!(
                session.api.get_workflow(&workflow_id),
                session.api.check_destination(&workflow_id)
            );
            let failure = result.as_ref().err().cloned();
            let now = (session.clock)();

            let applied =
                session.with(|controller| controller.finish_detail(ticket, result, now));
            surface(applied, failure)
        })
        .await
    }

    /// Copies the cleaned workflow.
    ///
    /// `Ok(None)` means nothing was sent: either the overwrite prompt must be
    /// shown or the operator declined it.
    pub async fn copy(&self, answer: Confirmation) -> Result<Option<Applied>, ControllerError> {
        let (ticket, request) = match self.with(|controller| controller.begin_copy(answer))? {
            CopyStep::Send(ticket, request) => (ticket, request),
            CopyStep::NeedsConfirmation | CopyStep::Declined => return Ok(None),
        };

        let session = self.clone();
        self.detach(async move {
            let result = session.api.copy_workflow(request).await;
            let failure = result.as_ref().err().cloned();

            let applied = session.with(|controller| controller.finish_copy(ticket, result));
            surface(applied, failure)
        })
        .await
        .map(Some)
    }

    /// Discards the session and reloads the workflow list.
    pub async fn back(&self) -> Result<Applied, ControllerError> {
        self.restart();
        self.load_workflows().await
    }

    /// Discards the session and returns to the initial screen.
    pub fn restart(&self) {
        self.with(|controller| controller.reset());
    }
}

fn surface(applied: Applied, failure: Option<ApiError>) -> Result<Applied, ControllerError> {
    match (applied, failure) {
        (Applied::Applied, Some(err)) => Err(ControllerError::Api(err)),
        (Applied::Stale, _) => {
            debug!("Response arrived after a reset");
            Ok(Applied::Stale)
        }
        (applied, None) => Ok(applied),
    }
}
