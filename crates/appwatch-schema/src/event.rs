//! Results produced by the two checks.

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Summary returned by an ad-hoc check of a single application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    /// Application identifier as requested.
    pub app_id: String,
    /// Display name reported upstream.
    pub app_name: String,
    /// Numeric version code of the primary binary.
    pub version_code: Version,
    /// Human-readable version string of the primary binary.
    pub version_string: String,
    /// Release date of the binary as an ISO 8601 timestamp.
    pub release_date: String,
    /// Binary size in gigabytes, e.g. `"1.50 GB"`.
    pub file_size: String,
}

/// A version change detected by the persistent check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    /// Application identifier.
    pub app_id: String,
    /// Display name, when configured or reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Newly observed version.
    pub version: Version,
    /// Version recorded before this change; absent on first sighting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<Version>,
    /// Release date of the binary as an ISO 8601 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Changelog text, already truncated for delivery.
    pub changelog: String,
}
