//! Per-browser copy sessions.
//!
//! Each browser gets a [`SessionHandle`] keyed by a random UUID stored in the
//! `copier_session` cookie. Nothing is persisted; idle sessions are dropped
//! after the configured TTL.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, info};
use uuid::Uuid;

use super::state::ServerState;
use crate::api::CopierApi;
use crate::backend::Clock;
use crate::controller::SessionHandle;

pub const COOKIE_SESSION_KEY: &str = "copier_session";

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

pub struct SessionRegistry {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Session for `id`, or a fresh one with a new id if `id` is unknown or
    /// expired. The returned bool is true when a session was created.
    pub fn get_or_create(
        &self,
        id: Option<Uuid>,
        api: &Arc<dyn CopierApi>,
        clock: &Clock,
        now: Instant,
    ) -> (Uuid, SessionHandle, bool) {
        let mut sessions = self.sessions.lock().unwrap();
        self.prune_locked(&mut sessions, now);

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.handle.clone(), false);
            }
            debug!("Unknown or expired session {}", id);
        }

        let id = Uuid::new_v4();
        let handle = SessionHandle::new(api.clone(), clock.clone());
        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_seen: now,
            },
        );
        info!("Started session {} ({} active)", id, sessions.len());
        (id, handle, true)
    }

    /// Drops sessions idle for longer than the TTL.
    pub fn prune(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        self.prune_locked(&mut sessions, now)
    }

    fn prune_locked(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {} idle sessions", pruned);
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The caller's copy session, plus the cookie jar to return with the
/// response.
pub struct UiSession {
    pub id: Uuid,
    pub handle: SessionHandle,
    pub jar: CookieJar,
}

fn session_cookie(id: Uuid, ttl: Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION_KEY, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .build()
}

impl FromRequestParts<ServerState> for UiSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, ctx).await?;
        let cookie_id = jar
            .get(COOKIE_SESSION_KEY)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        let (id, handle, _) =
            ctx.sessions
                .get_or_create(cookie_id, &ctx.ui_api, &ctx.clock, Instant::now());

        // Re-issued on every request so the expiry follows the idle TTL.
        let jar = jar.add(session_cookie(id, ctx.sessions.ttl()));

        Ok(UiSession { id, handle, jar })
    }
}
