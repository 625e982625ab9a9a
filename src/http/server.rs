//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, API timeout)
//! - Mount the connection-limited passthrough without a request timeout
//! - Serve the generated site for everything else
//! - Bind server to listener and drain on shutdown

use std::future::IntoFuture;
use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::demo::{setup_demo_router, DemoState};
use crate::http::middleware::{cors_layer, options_ok};
use crate::http::request::{make_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::status::get_health;
use crate::lifecycle::{signals, Shutdown};
use crate::proxy::{passthrough_handler, Passthrough, PassthroughError};

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Passthrough(#[from] PassthroughError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the demo site.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    passthrough: Passthrough,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let passthrough = Passthrough::from_config(&config.gate, &config.timeouts)?;
        let router = Self::build_router(&config, passthrough.clone(), DemoState::seeded());
        Ok(Self {
            router,
            config,
            passthrough,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, passthrough: Passthrough, demo: DemoState) -> Router {
        let prefix = passthrough.inbound_prefix().to_string();

        let api = setup_demo_router(demo).layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.api_request_secs,
        )));

        let gate = Router::new()
            .route(&prefix, any(passthrough_handler))
            .route(&format!("{prefix}/"), any(passthrough_handler))
            .route(&format!("{prefix}/{{*rest}}"), any(passthrough_handler))
            .route("/health", get(get_health))
            .with_state(passthrough);

        Router::new()
            .merge(api)
            .merge(gate)
            .fallback_service(ServeDir::new(PathBuf::from(&config.site.dir)))
            .layer(middleware::from_fn(options_ok))
            .layer(cors_layer())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| make_span(request)))
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` is triggered or the process is
    /// signalled.
    ///
    /// After the trigger, open connections get `shutdown_drain_secs` to
    /// finish. Streams still open at the deadline are dropped with the
    /// serve future, which releases their gate permits.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.gate.upstream,
            max_connections = self.passthrough.gate().max_connections(),
            "HTTP server starting"
        );

        let on_signal = {
            let shutdown = shutdown.clone();
            let mut signal = shutdown.subscribe();
            tokio::spawn(async move {
                tokio::select! {
                    _ = signals::terminate_signal() => shutdown.trigger(),
                    _ = signal.recv() => {}
                }
            })
        };

        let graceful = {
            let mut signal = shutdown.subscribe();
            async move {
                signal.recv().await;
                tracing::info!("Shutdown signal received");
            }
        };
        let drain = Duration::from_secs(self.config.timeouts.shutdown_drain_secs);
        let deadline = shutdown.subscribe().deadline(drain);

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(graceful)
            .into_future();

        tokio::select! {
            result = serve => result?,
            _ = deadline => {
                tracing::warn!(
                    active = self.passthrough.gate().active(),
                    "Drain deadline reached, dropping open connections"
                );
            }
        }
        on_signal.abort();

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The passthrough route, for inspecting its gate.
    pub fn passthrough(&self) -> &Passthrough {
        &self.passthrough
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
