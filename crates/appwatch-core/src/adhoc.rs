//! Ad-hoc check: look up one application and announce it to a caller-supplied
//! webhook. Holds no state between calls.

use std::sync::Arc;

use appwatch_schema::{AppSummary, Version, format_file_size, format_timestamp, from_epoch_seconds};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::client::build_client;
use crate::config::Config;
use crate::error::{CheckError, ConfigError};
use crate::notify::{Notifier, WebhookClient, embed};
use crate::upstream::{AppDetails, GraphClient, MetadataSource};

/// Request body of an ad-hoc check. Both fields are required; they are
/// optional here so that their absence is reported as a validation error
/// rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdhocRequest {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl AdhocRequest {
    /// Request with both fields set.
    pub fn new(app_id: impl Into<String>, webhook_url: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            webhook_url: Some(webhook_url.into()),
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, CheckError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(CheckError::Missing(name))
}

/// Build the summary for `app_id` from upstream details.
pub fn summarize(app_id: &str, details: &AppDetails, released_at: DateTime<Utc>) -> AppSummary {
    let binary = details.primary_binary.clone().unwrap_or_default();
    AppSummary {
        app_id: app_id.to_string(),
        app_name: details
            .display_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown App".to_string()),
        version_code: binary.version.unwrap_or_else(|| Version::from("Unknown")),
        version_string: binary
            .version_string
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        release_date: format_timestamp(released_at),
        file_size: format_file_size(binary.size.unwrap_or(0)),
    }
}

fn release_time(details: &AppDetails, now: DateTime<Utc>) -> DateTime<Utc> {
    details
        .primary_binary
        .as_ref()
        .and_then(|b| b.created_date)
        .and_then(from_epoch_seconds)
        .unwrap_or(now)
}

/// Looks up one application and posts it to the webhook named in the request.
#[derive(Clone)]
pub struct AdhocChecker {
    source: Arc<dyn MetadataSource>,
    notifier: Arc<dyn Notifier>,
    username: Option<String>,
    avatar_url: Option<String>,
}

impl std::fmt::Debug for AdhocChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdhocChecker").finish_non_exhaustive()
    }
}

impl AdhocChecker {
    /// Checker without a poster identity.
    pub fn new(source: Arc<dyn MetadataSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            username: None,
            avatar_url: None,
        }
    }

    /// Set the poster identity used on every message.
    pub fn with_identity(mut self, username: Option<String>, avatar_url: Option<String>) -> Self {
        self.username = username;
        self.avatar_url = avatar_url;
        self
    }

    /// Build the HTTP-backed checker described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let timeout = config.request_timeout();
        let upstream = build_client(&config.upstream.user_agent, None, timeout)?;
        let webhook = build_client(crate::USER_AGENT, None, timeout)?;
        Ok(Self::new(
            Arc::new(GraphClient::new(upstream, &config.upstream)),
            Arc::new(WebhookClient::new(webhook)),
        )
        .with_identity(
            config.webhook.username.clone(),
            config.webhook.avatar_url.clone(),
        ))
    }

    /// Validate the request, fetch the application, notify the webhook and
    /// return the summary. Validation happens before any network call.
    #[instrument(skip_all, fields(app_id = request.app_id.as_deref().unwrap_or("")))]
    pub async fn check_and_notify(&self, request: &AdhocRequest) -> Result<AppSummary, CheckError> {
        let app_id = required(request.app_id.as_deref(), "appId")?;
        let webhook_url = required(request.webhook_url.as_deref(), "webhookUrl")?;

        let details = self
            .source
            .app_details(app_id)
            .await?
            .ok_or_else(|| CheckError::NotFound {
                app_id: app_id.to_string(),
            })?;

        let now = Utc::now();
        let released_at = release_time(&details, now);
        let summary = summarize(app_id, &details, released_at);

        let message = embed::summary_message(&summary, released_at, now)
            .with_identity(self.username.clone(), self.avatar_url.clone());
        self.notifier.send(webhook_url, &message).await?;

        info!(
            app = %summary.app_name,
            version = %summary.version_string,
            "Update checked and notification sent"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::PrimaryBinary;

    #[test]
    fn summary_formats_size_and_date() {
        let details = AppDetails {
            display_name: Some("Demo".into()),
            primary_binary: Some(PrimaryBinary {
                version: Some(Version::from(321_u64)),
                version_string: Some("3.2.1".into()),
                created_date: Some(1_700_000_000),
                size: Some(3_221_225_472),
            }),
        };
        let released = release_time(&details, Utc::now());
        let summary = summarize("99", &details, released);

        assert_eq!(summary.app_name, "Demo");
        assert_eq!(summary.version_code, Version::from(321_u64));
        assert_eq!(summary.file_size, "3.00 GB");
        assert_eq!(summary.release_date, "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn summary_defaults_when_binary_missing() {
        let now = from_epoch_seconds(86_400).unwrap();
        let details = AppDetails::default();
        let summary = summarize("1", &details, release_time(&details, now));

        assert_eq!(summary.app_name, "Unknown App");
        assert_eq!(summary.version_code, Version::from("Unknown"));
        assert_eq!(summary.version_string, "Unknown");
        assert_eq!(summary.file_size, "0.00 GB");
        assert_eq!(summary.release_date, "1970-01-02T00:00:00.000Z");
    }

    #[test]
    fn blank_fields_are_missing() {
        assert!(matches!(
            required(Some("  "), "appId"),
            Err(CheckError::Missing("appId"))
        ));
        assert!(matches!(
            required(None, "webhookUrl"),
            Err(CheckError::Missing("webhookUrl"))
        ));
        assert_eq!(required(Some(" 12 "), "appId").unwrap(), "12");
    }
}
