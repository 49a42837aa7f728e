//! Cache-Control middleware for pages rendered from session state

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};

pub async fn no_cache(request: Request<Body>, next: Next) -> impl IntoResponse {
    let response = next.run(request).await.into_response();

    let (mut parts, body) = response.into_parts();
    parts.headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );

    axum::http::Response::from_parts(parts, body)
}
