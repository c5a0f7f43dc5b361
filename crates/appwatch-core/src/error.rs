//! Domain-specific errors for update checks

use std::path::PathBuf;

use appwatch_schema::RecordError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepo(String),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failures talking to the upstream metadata API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Failed to fetch app data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch app data: HTTP {0}")]
    Status(StatusCode),
}

/// Failures delivering a webhook message.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to send webhook: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to send webhook: HTTP {0}")]
    Status(StatusCode),
}

/// Failures reading or writing the version record.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Version store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Version store returned HTTP {0}")]
    Status(StatusCode),

    #[error("Version store changed since it was read")]
    Conflict,

    #[error("Stored content is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a check can fail with.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("App not found")]
    NotFound { app_id: String },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
