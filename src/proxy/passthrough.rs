//! Connection-limited passthrough handler.
//!
//! # Data Flow
//! ```text
//! inbound request under the gate prefix
//!     → rewrite.rs (prefix swap, query preserved)
//!     → gate.rs (admit or 429)
//!     → forward upstream (reqwest, no total timeout)
//!     → headers.rs (hop-by-hop strip, SSE headers forced)
//!     → streamed body owning the permit
//! ```
//!
//! The permit travels with the response body. It is dropped when the body
//! finishes, when the client goes away and hyper drops the body, or when
//! the handler future is cancelled before the upstream answers.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::Stream;
use thiserror::Error;

use crate::config::{GateConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::proxy::gate::{AdmissionPermit, ConnectionGate};
use crate::proxy::headers::{normalize_response_headers, upstream_request_headers};
use crate::proxy::rewrite::PathRewrite;

/// Body returned for rejected connections.
pub const TOO_MANY_CONNECTIONS: &str = "Too many connections";

/// Largest inbound request body forwarded upstream.
const MAX_FORWARD_BODY: usize = 1024 * 1024;

/// Errors building the passthrough from configuration.
#[derive(Debug, Error)]
pub enum PassthroughError {
    #[error("invalid upstream URL: {0}")]
    Upstream(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Shared state of the passthrough route.
#[derive(Clone)]
pub struct Passthrough {
    gate: Arc<ConnectionGate>,
    rewrite: Arc<PathRewrite>,
    client: reqwest::Client,
}

impl Passthrough {
    /// Build from configuration.
    pub fn from_config(gate: &GateConfig, timeouts: &TimeoutConfig) -> Result<Self, PassthroughError> {
        let base = url::Url::parse(&gate.upstream)?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.upstream_connect_secs))
            .build()?;

        Ok(Self {
            gate: Arc::new(ConnectionGate::new(gate.max_connections)),
            rewrite: Arc::new(PathRewrite::new(&base, &gate.inbound_prefix, &gate.upstream_prefix)),
            client,
        })
    }

    /// The admission gate guarding this route.
    pub fn gate(&self) -> &Arc<ConnectionGate> {
        &self.gate
    }

    /// Inbound prefix served by this route.
    pub fn inbound_prefix(&self) -> &str {
        self.rewrite.inbound_prefix()
    }
}

/// Axum handler for every method under the gate prefix.
pub async fn passthrough_handler(
    State(state): State<Passthrough>,
    request: Request<Body>,
) -> Response {
    let Some(target) = state.rewrite.target(request.uri()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let Some(permit) = state.gate.try_admit() else {
        metrics::record_request("passthrough", 429);
        return too_many_connections();
    };

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, MAX_FORWARD_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(connection_id = %permit.id(), error = %e, "Failed to read request body");
            metrics::record_request("passthrough", 400);
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    tracing::debug!(
        connection_id = %permit.id(),
        method = %parts.method,
        target = %target,
        "Forwarding"
    );

    let upstream = state
        .client
        .request(parts.method, target)
        .headers(upstream_request_headers(&parts.headers))
        .body(body)
        .send()
        .await;

    match upstream {
        Ok(upstream) => {
            let status = upstream.status();
            let mut headers = upstream.headers().clone();
            normalize_response_headers(&mut headers);
            metrics::record_request("passthrough", status.as_u16());

            let stream = PermitStream::new(Box::pin(upstream.bytes_stream()), permit);
            let mut response = Response::new(Body::from_stream(stream));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        Err(e) => {
            tracing::error!(connection_id = %permit.id(), error = %e, "Upstream error");
            metrics::record_upstream_error();
            metrics::record_request("passthrough", 502);
            drop(permit);
            (StatusCode::BAD_GATEWAY, format!("Upstream request failed: {e}")).into_response()
        }
    }
}

fn too_many_connections() -> Response {
    let mut response = (StatusCode::TOO_MANY_REQUESTS, TOO_MANY_CONNECTIONS).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Upstream body stream that holds a gate slot until it is dropped.
pub struct PermitStream<S> {
    inner: S,
    permit: AdmissionPermit,
}

impl<S> PermitStream<S> {
    pub fn new(inner: S, permit: AdmissionPermit) -> Self {
        Self { inner, permit }
    }
}

impl<S, T, E> Stream for PermitStream<S>
where
    S: Stream<Item = Result<T, E>> + Unpin,
    E: std::fmt::Display,
{
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = Pin::new(&mut self.inner).poll_next(cx);
        match &polled {
            Poll::Ready(None) => {
                tracing::debug!(connection_id = %self.permit.id(), "Upstream stream finished");
            }
            Poll::Ready(Some(Err(e))) => {
                tracing::warn!(connection_id = %self.permit.id(), error = %e, "Upstream stream failed");
                metrics::record_upstream_error();
            }
            _ => {}
        }
        polled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{stream, StreamExt};

    #[tokio::test]
    async fn permit_released_when_stream_ends() {
        let gate = Arc::new(ConnectionGate::new(1));
        let permit = gate.try_admit().unwrap();
        let chunks = stream::iter(vec![Ok::<_, std::convert::Infallible>("a"), Ok("b")]);

        let mut guarded = PermitStream::new(chunks, permit);
        assert_eq!(gate.active(), 1);
        while guarded.next().await.is_some() {}
        assert_eq!(gate.active(), 1, "slot held until the body is dropped");

        drop(guarded);
        assert_eq!(gate.active(), 0);
    }

    #[tokio::test]
    async fn permit_released_when_stream_abandoned() {
        let gate = Arc::new(ConnectionGate::new(1));
        let permit = gate.try_admit().unwrap();
        let endless = stream::repeat(Ok::<_, std::convert::Infallible>("tick"));

        let mut guarded = PermitStream::new(endless, permit);
        guarded.next().await;
        assert!(gate.try_admit().is_none());

        drop(guarded);
        assert!(gate.try_admit().is_some());
    }

    #[test]
    fn rejection_is_plain_text_429() {
        let response = too_many_connections();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}
