//! n8n Workflow Copier
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod n8n;
pub mod revision;
pub mod server;
pub mod view;

// Re-export commonly used types for convenience
pub use api::{CopierApi, HttpCopierApi};
pub use backend::CopierService;
pub use n8n::{N8nClient, WorkflowInstance};
pub use server::{run_server, RequestsLoggingLevel};
