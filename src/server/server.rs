use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tracing::{debug, info};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{
    api_routes::make_api_routes, log_requests, no_cache, session::SessionRegistry, state::*,
    ui_routes::make_ui_routes, ServerConfig,
};
use crate::backend::Clock;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub sessions: usize,
    pub api_enabled: bool,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        sessions: state.sessions.len(),
        api_enabled: state.api_enabled,
    })
}

impl ServerState {
    fn new(
        config: ServerConfig,
        ui_api: GuardedCopierApi,
        api_enabled: bool,
        clock: Clock,
    ) -> ServerState {
        let ttl = Duration::from_secs(config.session_ttl_sec);
        ServerState {
            config,
            start_time: Instant::now(),
            ui_api,
            api_enabled,
            sessions: Arc::new(SessionRegistry::new(ttl)),
            clock,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

fn make_router(state: ServerState, backend: Option<GuardedCopierApi>) -> Router {
    let health_router: Router = Router::new()
        .route("/health", get(health))
        .with_state(state.clone());

    let ui_router = make_ui_routes(state.clone()).layer(middleware::from_fn(no_cache));

    let mut app: Router = health_router.merge(ui_router);
    if let Some(backend) = backend {
        app = app.nest("/api", make_api_routes(backend));
    }

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(
        state.config.requests_logging_level.clone(),
        log_requests,
    ));

    app
}

/// Builds the application router.
///
/// `ui_api` drives the web pages. `backend`, when present, is exposed as the
/// JSON API under `/api`.
pub fn make_app(
    config: ServerConfig,
    ui_api: GuardedCopierApi,
    backend: Option<GuardedCopierApi>,
    clock: Clock,
) -> Router {
    let state = ServerState::new(config, ui_api, backend.is_some(), clock);
    make_router(state, backend)
}

/// Drops idle browser sessions once per TTL period.
fn spawn_session_pruning(sessions: GuardedSessionRegistry) {
    let period = sessions.ttl().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // Skip the first immediate tick, wait for the first interval
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let pruned = sessions.prune(Instant::now());
            if pruned > 0 {
                debug!("Session pruning dropped {} sessions", pruned);
            }
        }
    });
}

pub async fn run_server(
    config: ServerConfig,
    ui_api: GuardedCopierApi,
    backend: Option<GuardedCopierApi>,
    clock: Clock,
) -> Result<()> {
    let port = config.port;
    let state = ServerState::new(config, ui_api, backend.is_some(), clock);
    spawn_session_pruning(state.sessions.clone());
    let app = make_router(state, backend);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
