//! HTMX demo companion server.
//!
//! Serves the generated demo site, the HTML-fragment demo API, and a
//! connection-limited passthrough to an upstream server-sent-events demo.

pub mod config;
pub mod demo;
pub mod devserver;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
