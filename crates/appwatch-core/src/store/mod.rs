//! Version record persistence.
//!
//! A store hands out the record together with a [`ConcurrencyToken`] and
//! only accepts a write carrying the token it last handed out, so two
//! overlapping runs cannot silently overwrite each other.

pub mod github;
pub mod local;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use appwatch_schema::VersionRecord;
use async_trait::async_trait;

use crate::client::build_client;
use crate::config::StoreConfig;
use crate::error::{ConfigError, StoreError};

pub use github::GithubContentsStore;
pub use local::LocalFileStore;

/// Opaque value identifying the stored revision a record was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    /// Wrap a store-specific revision value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record as read, plus the token needed to write it back.
/// `token` is `None` when nothing has been stored yet.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub record: VersionRecord,
    pub token: Option<ConcurrencyToken>,
}

/// Durable home of the version record, with compare-and-swap writes.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Human-readable location, for logs.
    fn location(&self) -> String;

    async fn load(&self) -> Result<Snapshot, StoreError>;

    /// Replace the stored record. Fails with [`StoreError::Conflict`] if the
    /// stored revision no longer matches `token`.
    async fn save(
        &self,
        record: &VersionRecord,
        token: Option<&ConcurrencyToken>,
        message: &str,
    ) -> Result<(), StoreError>;
}

/// Open the store described by `config`.
pub fn open(config: &StoreConfig, timeout: Duration) -> Result<Arc<dyn VersionStore>, ConfigError> {
    match config {
        StoreConfig::Github {
            repo,
            path,
            branch,
            token,
            api_url,
        } => {
            let client = build_client(crate::USER_AGENT, token.as_deref(), timeout)?;
            let store = GithubContentsStore::new(client, api_url, repo, path, branch.clone())?;
            Ok(Arc::new(store))
        }
        StoreConfig::Local { path } => Ok(Arc::new(LocalFileStore::new(path.clone()))),
    }
}
