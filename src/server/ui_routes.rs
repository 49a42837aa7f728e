//! Server-rendered pages of the copy flow.
//!
//! Every action is a form POST that drives the caller's session and then
//! redirects back to `/`, which renders the current screen.

use axum::{
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::session::UiSession;
use super::state::ServerState;
use crate::controller::{Confirmation, ControllerError};
use crate::view::render_page;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ContinueForm {
    workflow_id: Option<String>,
    reason: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct CopyForm {
    answer: Option<String>,
}

impl CopyForm {
    fn confirmation(&self) -> Confirmation {
        match self.answer.as_deref() {
            Some("yes") => Confirmation::Accepted,
            Some("no") => Confirmation::Declined,
            _ => Confirmation::Unanswered,
        }
    }
}

fn back_home(session: UiSession) -> Response {
    (session.jar, Redirect::to("/")).into_response()
}

fn report<T>(session: &UiSession, action: &str, result: Result<T, ControllerError>) {
    match result {
        Ok(_) => {}
        Err(ControllerError::Api(err)) => {
            warn!("Session {}: {} failed: {}", session.id, action, err)
        }
        Err(err) => debug!("Session {}: {} rejected: {}", session.id, action, err),
    }
}

async fn home(session: UiSession) -> Response {
    let page = render_page(&session.handle.snapshot());
    (session.jar, Html(page.into_string())).into_response()
}

async fn load_workflows(session: UiSession) -> Response {
    let result = session.handle.load_workflows().await;
    report(&session, "loading workflows", result);
    back_home(session)
}

async fn continue_to_detail(session: UiSession, Form(form): Form<ContinueForm>) -> Response {
    let result = session
        .handle
        .continue_to_detail(form.workflow_id.as_deref(), &form.reason)
        .await;
    report(&session, "loading workflow detail", result);
    back_home(session)
}

async fn copy(session: UiSession, Form(form): Form<CopyForm>) -> Response {
    let result = session.handle.copy(form.confirmation()).await;
    report(&session, "copying workflow", result);
    back_home(session)
}

async fn back(session: UiSession) -> Response {
    let result = session.handle.back().await;
    report(&session, "going back", result);
    back_home(session)
}

async fn restart(session: UiSession) -> Response {
    session.handle.restart();
    back_home(session)
}

pub fn make_ui_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/ui/workflows", post(load_workflows))
        .route("/ui/continue", post(continue_to_detail))
        .route("/ui/copy", post(copy))
        .route("/ui/back", post(back))
        .route("/ui/restart", post(restart))
        .with_state(state)
}
