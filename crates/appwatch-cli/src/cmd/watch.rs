//! Watch command

use std::time::Duration;

use anyhow::Result;
use appwatch_core::{Config, UpdateTracker};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use super::check::print_report;

/// Run persistent passes on a fixed interval until Ctrl-C.
///
/// A failed pass is logged and the next one runs on schedule. Ctrl-C stops
/// the loop at once, abandoning a pass in progress.
pub async fn watch(config: &Config, every: Option<u64>, dry_run: bool) -> Result<()> {
    let tracker = UpdateTracker::from_config(config, dry_run)?;
    let period = every.map_or_else(|| config.check_interval(), |s| Duration::from_secs(s.max(1)));

    info!(
        apps = tracker.apps().len(),
        interval_secs = period.as_secs(),
        "Starting watch loop"
    );

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        tokio::select! {
            result = tracker.run() => match result {
                Ok(report) => print_report(&report, dry_run),
                Err(e) => error!(error = %e, "Update check failed"),
            },
            _ = &mut shutdown => {
                warn!("Interrupted during a check, stopping");
                return Ok(());
            }
        }
        info!(next_in_secs = period.as_secs(), "Waiting for next check");
    }

    info!("Received Ctrl+C, stopping");
    Ok(())
}
