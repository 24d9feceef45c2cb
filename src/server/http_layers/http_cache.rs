//! HTTP caching middleware

use axum::{
    body::Body,
    extract::State,
    http::{header::CACHE_CONTROL, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Tags successful responses with `Cache-Control: max-age`.
pub async fn http_cache(
    State(max_age_sec): State<usize>,
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let response = next.run(request).await.into_response();
    if !response.status().is_success() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age_sec)) {
        parts.headers.insert(CACHE_CONTROL, value);
    }
    Response::from_parts(parts, body)
}
