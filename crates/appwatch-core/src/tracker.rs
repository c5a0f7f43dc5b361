//! Persistent check: compare every tracked application against the stored
//! version record, announce changes, and write the record back.
//!
//! One run is a single pass:
//!
//! 1. load the record and its concurrency token from the store,
//! 2. fetch each application's latest supported binary (ordered, at most
//!    `concurrency` requests in flight),
//! 3. for each changed or unseen application, in configured order: notify,
//!    then record the new version,
//! 4. write the whole record back with the token from step 1.
//!
//! Any failure aborts the run. Notifications already sent are not rolled
//! back.

use std::sync::Arc;

use appwatch_schema::{
    Observation, UpdateEvent, format_timestamp, from_epoch_seconds, truncate_chars,
};
use chrono::Utc;
use futures::{StreamExt, stream};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::client::build_client;
use crate::config::{Config, TrackedApp};
use crate::error::{CheckError, ConfigError};
use crate::notify::{Notifier, WebhookClient, embed};
use crate::store::{self, Snapshot, VersionStore};
use crate::upstream::{GraphClient, MetadataSource};

/// Changelog text used when the upstream gives none.
pub const DEFAULT_CHANGELOG: &str = "No changelog provided.";

/// Tuning for a persistent pass.
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// Upstream fetches in flight; 0 is treated as 1.
    pub concurrency: usize,
    /// Maximum changelog length, in characters.
    pub changelog_limit: usize,
    /// Detect only: no webhook posts and no write-back.
    pub dry_run: bool,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            changelog_limit: 1000,
            dry_run: false,
            username: None,
            avatar_url: None,
        }
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Tracked applications in this pass.
    pub checked: usize,
    pub updates: Vec<UpdateEvent>,
}

/// Runs the persistent check over a fixed list of tracked applications.
pub struct UpdateTracker {
    source: Arc<dyn MetadataSource>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn VersionStore>,
    apps: Vec<TrackedApp>,
    webhook_url: String,
    options: TrackerOptions,
}

impl std::fmt::Debug for UpdateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateTracker")
            .field("store", &self.store.location())
            .field("apps", &self.apps)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl UpdateTracker {
    /// Tracker with default options.
    pub fn new(
        source: Arc<dyn MetadataSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn VersionStore>,
        apps: Vec<TrackedApp>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            apps,
            webhook_url: webhook_url.into(),
            options: TrackerOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: TrackerOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the HTTP-backed tracker described by `config`. Fails when no
    /// webhook or no applications are configured.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self, ConfigError> {
        let webhook_url = config.tracking_webhook()?;
        let timeout = config.request_timeout();

        let upstream = build_client(&config.upstream.user_agent, None, timeout)?;
        let webhook = build_client(crate::USER_AGENT, None, timeout)?;

        Ok(Self::new(
            Arc::new(GraphClient::new(upstream, &config.upstream)),
            Arc::new(WebhookClient::new(webhook)),
            store::open(&config.store, timeout)?,
            config.apps.clone(),
            webhook_url,
        )
        .with_options(TrackerOptions {
            concurrency: config.concurrency,
            changelog_limit: config.changelog_limit,
            dry_run,
            username: config.webhook.username.clone(),
            avatar_url: config.webhook.avatar_url.clone(),
        }))
    }

    /// Applications checked on every pass.
    pub fn apps(&self) -> &[TrackedApp] {
        &self.apps
    }

    /// Run one pass. See the module docs for the steps.
    #[instrument(skip(self), fields(apps = self.apps.len(), dry_run = self.options.dry_run))]
    pub async fn run(&self) -> Result<RunReport, CheckError> {
        let Snapshot { mut record, token } = self.store.load().await?;
        info!(
            store = %self.store.location(),
            known = record.len(),
            "Starting update check"
        );

        let mut fetches = stream::iter(self.apps.clone())
            .map(|app| {
                let source = Arc::clone(&self.source);
                async move {
                    let fetched = source.latest_binary(&app.id).await;
                    (app, fetched)
                }
            })
            .buffered(self.options.concurrency.max(1));

        let mut updates = Vec::new();
        while let Some((app, fetched)) = fetches.next().await {
            let Some(binary) = fetched? else {
                debug!(app_id = %app.id, "No supported binary, skipping");
                continue;
            };

            let previous_version = match record.compare(&app.id, &binary.version) {
                Observation::Unchanged => {
                    debug!(app_id = %app.id, version = %binary.version, "Unchanged");
                    continue;
                }
                Observation::First => None,
                Observation::Changed(prev) => Some(prev.clone()),
            };

            let released_at = binary.created_date.and_then(from_epoch_seconds);
            let changelog = binary
                .change_log
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CHANGELOG);

            let event = UpdateEvent {
                app_id: app.id.clone(),
                app_name: app.name.clone(),
                version: binary.version.clone(),
                previous_version,
                release_date: released_at.map(format_timestamp),
                changelog: truncate_chars(changelog, self.options.changelog_limit),
            };
            info!(
                app_id = %event.app_id,
                version = %event.version,
                previous = ?event.previous_version.as_ref().map(ToString::to_string),
                "Update detected"
            );

            if !self.options.dry_run {
                let message = embed::update_message(&event, released_at, Utc::now()).with_identity(
                    self.options.username.clone(),
                    self.options.avatar_url.clone(),
                );
                self.notifier.send(&self.webhook_url, &message).await?;
            }

            record.insert(app.id.clone(), binary.version);
            updates.push(event);
        }

        if updates.is_empty() {
            info!("No updates detected");
        } else if self.options.dry_run {
            info!(count = updates.len(), "Dry run, not saving versions");
        } else {
            self.store
                .save(&record, token.as_ref(), &commit_message(&updates))
                .await?;
        }

        Ok(RunReport {
            checked: self.apps.len(),
            updates,
        })
    }
}

fn commit_message(updates: &[UpdateEvent]) -> String {
    let ids: Vec<&str> = updates.iter().map(|u| u.app_id.as_str()).collect();
    format!("Update versions: {}", ids.join(", "))
}
