//! Service configuration.
//!
//! Loaded from a TOML file (default `~/.appwatch/config.toml`), then
//! overridden by environment variables for secrets and deployment-specific
//! values. Every field has a default so a missing file still yields a
//! usable configuration for ad-hoc checks.
//!
//! ```toml
//! bind = "0.0.0.0:3000"
//! check_interval_secs = 3600
//!
//! [webhook]
//! url = "https://discord.com/api/webhooks/..."
//!
//! [store]
//! kind = "github"
//! repo = "owner/state"
//! path = "versions.json"
//!
//! [[apps]]
//! id = "8485526434899813"
//! name = "Example"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;

pub const DEFAULT_GRAPHQL_URL: &str = "https://graph.oculus.com/graphql";
pub const DEFAULT_GRAPH_URL: &str = "https://graph.oculus.com";
pub const DEFAULT_DOC_ID: &str = "5303836509676156";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const WEBHOOK_URL_ENV: &str = "APPWATCH_WEBHOOK_URL";
pub const GITHUB_TOKEN_ENV: &str = "APPWATCH_GITHUB_TOKEN";
pub const UPSTREAM_TOKEN_ENV: &str = "APPWATCH_UPSTREAM_TOKEN";
pub const BIND_ENV: &str = "APPWATCH_BIND";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listen address for `appwatch serve`.
    pub bind: String,
    /// Seconds between passes of `appwatch watch`.
    pub check_interval_secs: u64,
    /// Upstream fetches allowed in flight during a persistent pass.
    pub concurrency: usize,
    /// Per-request timeout for every outbound call.
    pub request_timeout_secs: u64,
    /// Maximum changelog length in a notification.
    pub changelog_limit: usize,
    pub upstream: UpstreamConfig,
    pub webhook: WebhookConfig,
    pub store: StoreConfig,
    pub apps: Vec<TrackedApp>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            check_interval_secs: 3600,
            concurrency: 1,
            request_timeout_secs: 10,
            changelog_limit: 1000,
            upstream: UpstreamConfig::default(),
            webhook: WebhookConfig::default(),
            store: StoreConfig::default(),
            apps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub graphql_url: String,
    pub graph_url: String,
    pub doc_id: String,
    pub access_token: Option<String>,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            doc_id: DEFAULT_DOC_ID.to_string(),
            access_token: None,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Destination for persistent-check notifications.
    pub url: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

/// Where the version record lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// A JSON file in a GitHub repository, via the contents API.
    Github {
        /// `owner/name`
        repo: String,
        #[serde(default = "default_remote_path")]
        path: String,
        #[serde(default)]
        branch: Option<String>,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_github_api")]
        api_url: String,
    },
    /// A JSON file on local disk.
    Local {
        #[serde(default = "paths::default_versions_path")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Local {
            path: paths::default_versions_path(),
        }
    }
}

fn default_remote_path() -> String {
    "versions.json".to_string()
}

fn default_github_api() -> String {
    DEFAULT_GITHUB_API.to_string()
}

/// An application watched by the persistent check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedApp {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl TrackedApp {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

impl Config {
    /// Load configuration from `path` (or the default location) and apply
    /// environment overrides.
    ///
    /// An explicitly given path must exist; a missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match paths::config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override values from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(WEBHOOK_URL_ENV) {
            self.webhook.url = Some(url);
        }
        if let Some(bind) = get(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(token) = get(UPSTREAM_TOKEN_ENV) {
            self.upstream.access_token = Some(token);
        }
        if let Some(value) = get(GITHUB_TOKEN_ENV) {
            if let StoreConfig::Github { token, .. } = &mut self.store {
                *token = Some(value);
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs.max(1))
    }

    /// Webhook URL for the persistent check, which also needs at least one
    /// tracked application.
    pub fn tracking_webhook(&self) -> Result<&str, ConfigError> {
        if self.apps.is_empty() {
            return Err(ConfigError::Missing("apps"));
        }
        self.webhook
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::Missing("webhook.url"))
    }
}
