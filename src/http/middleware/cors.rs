//! Cross-origin access for the demo site.
//!
//! Any origin may call every route. Preflights are answered by
//! `CorsLayer`; a bare `OPTIONS` without preflight headers is answered
//! with 200 here so it never reaches a handler or the upstream.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS policy: any origin, the demo's methods, any header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Answer every `OPTIONS` request with an empty 200.
pub async fn options_ok(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
