//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → middleware/cors.rs (CORS headers, OPTIONS)
//!     → /api/bad-apple/*  → proxy (gate + passthrough)
//!     → /api/*            → demo (HTML fragments)
//!     → /health           → status.rs
//!     → anything else     → static site
//! ```

pub mod middleware;
pub mod request;
pub mod server;
pub mod status;

pub use request::X_REQUEST_ID;
pub use server::{HttpServer, ServerError};
