//! Check command

use anyhow::Result;
use appwatch_core::{Config, RunReport, UpdateTracker};

/// Run one persistent pass and print what changed
pub async fn check(config: &Config, dry_run: bool) -> Result<()> {
    let tracker = UpdateTracker::from_config(config, dry_run)?;
    let report = tracker.run().await?;
    print_report(&report, dry_run);
    Ok(())
}

pub(crate) fn print_report(report: &RunReport, dry_run: bool) {
    if report.updates.is_empty() {
        println!("Checked {} apps, no updates", report.checked);
        return;
    }

    let verb = if dry_run { "Would announce" } else { "Announced" };
    println!("{verb} {} of {} apps:", report.updates.len(), report.checked);
    for update in &report.updates {
        let name = update.app_name.as_deref().unwrap_or(&update.app_id);
        match &update.previous_version {
            Some(prev) => println!("  {name}: {prev} -> {}", update.version),
            None => println!("  {name}: {} (new)", update.version),
        }
    }
}
