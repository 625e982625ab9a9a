//! Buffered `/api/*` forwarding for the dev server.
//!
//! Unlike the gated passthrough this collects both bodies in memory. It
//! exists so the site can be previewed on one origin while the API runs
//! separately.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

const API_PREFIX: &str = "/api/";
const MAX_BODY: usize = 16 * 1024 * 1024;
static DEFAULT_REQUEST_TYPE: HeaderValue = HeaderValue::from_static("application/x-www-form-urlencoded");
static DEFAULT_RESPONSE_TYPE: HeaderValue = HeaderValue::from_static("text/html");

/// Why a forwarded request failed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid backend URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUri),

    #[error("{0}")]
    Request(#[from] axum::http::Error),

    #[error("{0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read body: {0}")]
    Body(#[from] axum::Error),
}

/// Forwards API calls to the companion server.
#[derive(Clone)]
pub struct ApiForwarder {
    backend: String,
    client: Client<HttpConnector, Body>,
}

impl ApiForwarder {
    /// `backend` is a base URL such as `http://localhost:3001`.
    pub fn new(backend: impl Into<String>) -> Self {
        let backend = backend.into().trim_end_matches('/').to_string();
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { backend, client }
    }

    /// Backend URI for an inbound request URI.
    pub fn upstream_uri(&self, uri: &Uri) -> Result<Uri, ForwardError> {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        Ok(format!("{}{}", self.backend, path_and_query).parse()?)
    }

    /// Forward one request and buffer the reply.
    pub async fn forward(&self, request: Request) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();
        let uri = self.upstream_uri(&parts.uri)?;

        let body = if parts.method == Method::GET || parts.method == Method::HEAD {
            Body::empty()
        } else {
            Body::from(to_bytes(body, MAX_BODY).await?)
        };
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| DEFAULT_REQUEST_TYPE.clone());

        let upstream_request = axum::http::Request::builder()
            .method(parts.method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)?;

        let upstream: hyper::Response<Incoming> = self.client.request(upstream_request).await?;
        let status = upstream.status();
        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| DEFAULT_RESPONSE_TYPE.clone());
        let bytes = to_bytes(Body::new(upstream.into_body()), MAX_BODY).await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        Ok(response)
    }
}

/// Middleware: forward `/api/*`, pass everything else on.
pub async fn forward_api(
    State(forwarder): State<ApiForwarder>,
    request: Request,
    next: Next,
) -> Response {
    if !request.uri().path().starts_with(API_PREFIX) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    match forwarder.forward(request).await {
        Ok(response) => {
            tracing::debug!(method = %method, path = %path, status = %response.status(), "Forwarded");
            response
        }
        Err(e) => {
            tracing::warn!(method = %method, path = %path, error = %e, "Forwarding failed");
            (StatusCode::BAD_GATEWAY, format!("Proxy error: {e}")).into_response()
        }
    }
}
