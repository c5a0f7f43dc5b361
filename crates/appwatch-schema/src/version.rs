//! Version values and the persisted version record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A version as reported by the upstream API.
///
/// The upstream mixes numeric version codes and free-form version strings,
/// so both are accepted and compared by their canonical text form: the
/// number `2` equals the string `"2"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    /// Numeric version code (e.g. `1234`).
    Number(serde_json::Number),
    /// Free-form version string (e.g. `"1.2.3"`).
    Text(String),
}

impl Version {
    /// Canonical text form used for comparison and display.
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for Version {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

/// Errors raised while decoding or encoding a [`VersionRecord`].
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// The stored bytes are not a JSON object of versions.
    #[error("invalid version record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of comparing a fetched version against the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation<'a> {
    /// The stored version equals the fetched one.
    Unchanged,
    /// The application has never been seen.
    First,
    /// The application moved away from the contained version.
    Changed(&'a Version),
}

/// Mapping from application identifier to the last version notified.
///
/// Holds at most one entry per identifier; a missing entry means the
/// application has never been seen. Keys serialize in sorted order so that
/// repeated writes of the same content are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionRecord(BTreeMap<String, Version>);

impl VersionRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a record from stored JSON. Empty or whitespace-only input is an
    /// empty record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if the content is not a JSON object
    /// whose values are strings or numbers.
    pub fn from_json(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the record as pretty JSON (two-space indent, trailing newline).
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Last version recorded for `app_id`.
    pub fn get(&self, app_id: &str) -> Option<&Version> {
        self.0.get(app_id)
    }

    /// Compare `candidate` against the stored entry for `app_id`.
    pub fn compare(&self, app_id: &str, candidate: &Version) -> Observation<'_> {
        match self.0.get(app_id) {
            None => Observation::First,
            Some(stored) if stored == candidate => Observation::Unchanged,
            Some(stored) => Observation::Changed(stored),
        }
    }

    /// Overwrite the entry for `app_id`, returning the previous version.
    pub fn insert(&mut self, app_id: impl Into<String>, version: Version) -> Option<Version> {
        self.0.insert(app_id.into(), version)
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no application has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Version>> FromIterator<(K, V)> for VersionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
