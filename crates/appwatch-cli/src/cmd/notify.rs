//! Notify command

use anyhow::{Context, Result};
use appwatch_core::{AdhocChecker, AdhocRequest, Config};

/// Check one application and post its current version to a webhook
pub async fn notify(config: &Config, app_id: &str, webhook: Option<String>) -> Result<()> {
    let webhook_url = webhook
        .or_else(|| config.webhook.url.clone())
        .context("No webhook given and none configured (webhook.url)")?;

    let checker = AdhocChecker::from_config(config)?;
    let summary = checker
        .check_and_notify(&AdhocRequest::new(app_id, webhook_url))
        .await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
