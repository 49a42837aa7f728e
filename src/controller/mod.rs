//! Operator-facing copy flow: session state, the state machine driving it and
//! the async handle running it against a [`crate::api::CopierApi`].

mod session;
mod state;
mod view_controller;

pub use session::SessionHandle;
pub use state::{Action, Confirmation, DetailScreen, ResultScreen, Screen, SessionState};
pub use view_controller::{
    Applied, ControllerError, CopyStep, Ticket, ViewController, ENTER_REASON_MESSAGE,
    NOTHING_TO_COPY_MESSAGE, OVERWRITE_PROMPT, SELECT_WORKFLOW_MESSAGE,
};
