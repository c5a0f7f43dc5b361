//! Upstream application-metadata API.

pub mod graph;

use appwatch_schema::Version;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::UpstreamError;

pub use graph::GraphClient;

/// Application node returned by the store query used for ad-hoc checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppDetails {
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default, rename = "primaryBinary")]
    pub primary_binary: Option<PrimaryBinary>,
}

/// The binary currently offered on the store page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryBinary {
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default, rename = "versionString")]
    pub version_string: Option<String>,
    /// Epoch seconds.
    #[serde(default, alias = "createdDate", deserialize_with = "lenient_i64")]
    pub created_date: Option<i64>,
    /// Bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
}

/// Latest supported binary, used by the persistent check.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestBinary {
    pub version: Version,
    #[serde(default, alias = "changeLog", alias = "changelog")]
    pub change_log: Option<String>,
    /// Epoch seconds.
    #[serde(default, alias = "createdDate", deserialize_with = "lenient_i64")]
    pub created_date: Option<i64>,
}

/// A remote source of application metadata.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Look up an application for an ad-hoc check. `Ok(None)` when the
    /// upstream has no such application.
    async fn app_details(&self, app_id: &str) -> Result<Option<AppDetails>, UpstreamError>;

    /// Latest supported binary of an application. `Ok(None)` when the
    /// upstream reports none.
    async fn latest_binary(&self, app_id: &str) -> Result<Option<LatestBinary>, UpstreamError>;
}

// The upstream is inconsistent about numeric fields: epoch seconds and sizes
// arrive as integers, floats or numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<NumberOrText>::deserialize(d)?;
    Ok(raw.and_then(|v| match v {
        NumberOrText::Int(n) => Some(n),
        NumberOrText::Float(f) if f.is_finite() => Some(f.floor() as i64),
        NumberOrText::Float(_) => None,
        NumberOrText::Text(s) => s.trim().parse().ok(),
    }))
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(lenient_i64(d)?.and_then(|n| u64::try_from(n).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_binary_accepts_string_numbers() {
        let binary: PrimaryBinary = serde_json::from_str(
            r#"{"version": 123, "versionString": "1.2.3", "created_date": "1700000000", "size": "2048"}"#,
        )
        .unwrap();
        assert_eq!(binary.version, Some(Version::from(123_u64)));
        assert_eq!(binary.created_date, Some(1_700_000_000));
        assert_eq!(binary.size, Some(2048));
    }

    #[test]
    fn primary_binary_tolerates_missing_and_null_fields() {
        let binary: PrimaryBinary =
            serde_json::from_str(r#"{"versionString": null, "size": 1.5e3}"#).unwrap();
        assert!(binary.version.is_none());
        assert!(binary.version_string.is_none());
        assert!(binary.created_date.is_none());
        assert_eq!(binary.size, Some(1500));
    }

    #[test]
    fn latest_binary_accepts_camel_case() {
        let binary: LatestBinary = serde_json::from_str(
            r#"{"version": "2.0", "changeLog": "fixes", "createdDate": 1700000000.7}"#,
        )
        .unwrap();
        assert_eq!(binary.version, Version::from("2.0"));
        assert_eq!(binary.change_log.as_deref(), Some("fixes"));
        assert_eq!(binary.created_date, Some(1_700_000_000));
    }
}
