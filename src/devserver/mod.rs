//! Development server for previewing the generated site.
//!
//! # Data Flow
//! ```text
//! browser
//!     → /api/*          → forward.rs (buffered) → companion server
//!     → everything else → site directory
//! ```

pub mod forward;

use std::path::Path;

use axum::{middleware, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use forward::{forward_api, ApiForwarder, ForwardError};

/// Router serving `site_dir` with `/api/*` forwarded to `backend`.
pub fn dev_router(site_dir: &Path, backend: &str) -> Router {
    let forwarder = ApiForwarder::new(backend);
    Router::new()
        .fallback_service(ServeDir::new(site_dir))
        .layer(middleware::from_fn_with_state(forwarder, forward_api))
        .layer(TraceLayer::new_for_http())
}
