use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use super::session::SessionRegistry;
use super::ServerConfig;
use crate::api::CopierApi;
use crate::backend::Clock;

pub type GuardedCopierApi = Arc<dyn CopierApi>;
pub type GuardedSessionRegistry = Arc<SessionRegistry>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    /// Copier API the web pages are driven against.
    pub ui_api: GuardedCopierApi,
    /// Whether the JSON API is served under `/api`.
    pub api_enabled: bool,
    pub sessions: GuardedSessionRegistry,
    pub clock: Clock,
    pub hash: String,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedSessionRegistry {
    fn from_ref(input: &ServerState) -> Self {
        input.sessions.clone()
    }
}
