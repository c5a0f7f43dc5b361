use std::io::ErrorKind;
use std::path::PathBuf;

use appwatch_schema::VersionRecord;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info};

use super::{ConcurrencyToken, Snapshot, VersionStore};
use crate::error::StoreError;

/// Version record kept as a JSON file on local disk.
///
/// The token is the SHA-256 of the file content, so a write is refused if
/// the file changed (or appeared) after it was read.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_current(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn content_token(bytes: &[u8]) -> ConcurrencyToken {
    ConcurrencyToken::new(hex::encode(Sha256::digest(bytes)))
}

#[async_trait]
impl VersionStore for LocalFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Snapshot, StoreError> {
        let Some(bytes) = self.read_current().await? else {
            info!(path = %self.path.display(), "No previous versions found. Starting fresh.");
            return Ok(Snapshot::default());
        };

        let record = VersionRecord::from_json(&bytes)?;
        debug!(entries = record.len(), "Loaded version record");
        Ok(Snapshot {
            record,
            token: Some(content_token(&bytes)),
        })
    }

    async fn save(
        &self,
        record: &VersionRecord,
        token: Option<&ConcurrencyToken>,
        _message: &str,
    ) -> Result<(), StoreError> {
        let current = self.read_current().await?.map(|b| content_token(&b));
        if current.as_ref() != token {
            return Err(StoreError::Conflict);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        // Sibling temp file, then rename over the target
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, record.to_json_pretty()?).await?;
        fs::rename(&tmp, &self.path).await?;

        info!(path = %self.path.display(), entries = record.len(), "Saved version record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwatch_schema::Version;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path().join("versions.json"));

        let snapshot = store.load().await.unwrap();
        assert!(snapshot.record.is_empty());
        assert!(snapshot.token.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path().join("nested/versions.json"));

        let record: VersionRecord = [("a", "1"), ("b", "2")].into_iter().collect();
        store.save(&record, None, "init").await.unwrap();

        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.record, record);
        assert!(snapshot.token.is_some());
        assert!(!dir.path().join("nested/versions.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_stale_token_is_conflict() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versions.json");
        std::fs::write(&path, r#"{"a": "1"}"#).unwrap();
        let store = LocalFileStore::new(&path);

        let mut snapshot = store.load().await.unwrap();
        std::fs::write(&path, r#"{"a": "9"}"#).unwrap();

        snapshot.record.insert("b", Version::from("2"));
        let err = store
            .save(&snapshot.record, snapshot.token.as_ref(), "update")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_file_created_after_read_is_conflict() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versions.json");
        let store = LocalFileStore::new(&path);

        let snapshot = store.load().await.unwrap();
        std::fs::write(&path, "{}").unwrap();

        let err = store
            .save(&snapshot.record, snapshot.token.as_ref(), "update")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_invalid_content_is_record_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versions.json");
        std::fs::write(&path, "not json").unwrap();

        let err = LocalFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Record(_)));
    }
}
