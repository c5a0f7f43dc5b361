//! Serve command

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use appwatch_core::{AdhocChecker, Config, UpdateTracker};
use tracing::warn;

use crate::server::{AppState, start_server};

/// Run the HTTP service until shutdown
pub async fn serve(mut config: Config, bind: Option<String>, dry_run: bool) -> Result<()> {
    if let Some(bind) = bind {
        config.bind = bind;
    }
    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind))?;

    let adhoc = AdhocChecker::from_config(&config)?;
    let tracker = match config.tracking_webhook() {
        Ok(_) => Some(Arc::new(UpdateTracker::from_config(&config, dry_run)?)),
        Err(e) => {
            warn!(reason = %e, "Persistent check disabled");
            None
        }
    };

    start_server(AppState::new(adhoc, tracker), addr)
        .await
        .context("HTTP server failed")
}
