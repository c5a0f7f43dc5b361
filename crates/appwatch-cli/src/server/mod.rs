//! HTTP service.
//!
//! Routes:
//!
//! - `POST /api/check-update`: ad-hoc check, webhook supplied in the body
//! - `POST /api/check-updates`: persistent check over the tracked apps
//! - `GET /health`
//!
//! Other methods on the check routes answer 405 with a JSON body.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use appwatch_core::{AdhocChecker, UpdateTracker};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub adhoc: AdhocChecker,
    /// `None` when no webhook or no apps are configured.
    pub tracker: Option<Arc<UpdateTracker>>,
}

impl AppState {
    pub fn new(adhoc: AdhocChecker, tracker: Option<Arc<UpdateTracker>>) -> Self {
        Self { adhoc, tracker }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/check-update",
            post(handlers::check_update).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/check-updates",
            post(handlers::check_updates).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM, then let in-flight requests finish.
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
