//! Random slowdown middleware for exercising loading states

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rand::Rng;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 3000;

/// Middleware that delays each request by a uniformly random amount of time,
/// up to three seconds.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let delay = rand::rng().random_range(0..=MAX_DELAY_MS);

    tokio::time::sleep(Duration::from_millis(delay)).await;
    next.run(request).await
}
