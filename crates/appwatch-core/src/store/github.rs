use appwatch_schema::VersionRecord;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ConcurrencyToken, Snapshot, VersionStore};
use crate::error::{ConfigError, StoreError};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct ContentsFile {
    #[serde(default)]
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

/// Version record kept as a JSON file in a GitHub repository.
///
/// The file's blob `sha` is the concurrency token; GitHub rejects a write
/// whose `sha` is stale.
#[derive(Debug, Clone)]
pub struct GithubContentsStore {
    client: Client,
    url: String,
    branch: Option<String>,
}

impl GithubContentsStore {
    /// `repo` is `owner/name`; `path` is relative to the repository root.
    pub fn new(
        client: Client,
        api_url: &str,
        repo: &str,
        path: &str,
        branch: Option<String>,
    ) -> Result<Self, ConfigError> {
        let (owner, name) = repo
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| ConfigError::InvalidRepo(repo.to_string()))?;

        let url = format!(
            "{}/repos/{owner}/{name}/contents/{}",
            api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Self {
            client,
            url,
            branch,
        })
    }
}

/// The contents API wraps base64 at 60 columns.
fn decode_content(content: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

#[async_trait]
impl VersionStore for GithubContentsStore {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<Snapshot, StoreError> {
        let mut req = self.client.get(&self.url).header(header::ACCEPT, GITHUB_ACCEPT);
        if let Some(branch) = &self.branch {
            req = req.query(&[("ref", branch.as_str())]);
        }

        let resp = req.send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            info!(url = %self.url, "No stored versions yet, starting fresh");
            return Ok(Snapshot::default());
        }
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status()));
        }

        let file: ContentsFile = resp.json().await?;
        let record = VersionRecord::from_json(&decode_content(&file.content)?)?;
        debug!(entries = record.len(), sha = %file.sha, "Loaded version record");
        Ok(Snapshot {
            record,
            token: Some(ConcurrencyToken::new(file.sha)),
        })
    }

    async fn save(
        &self,
        record: &VersionRecord,
        token: Option<&ConcurrencyToken>,
        message: &str,
    ) -> Result<(), StoreError> {
        let body = PutContents {
            message,
            content: STANDARD.encode(record.to_json_pretty()?),
            sha: token.map(ConcurrencyToken::as_str),
            branch: self.branch.as_deref(),
        };

        let resp = self
            .client
            .put(&self.url)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => {
                info!(entries = record.len(), "Saved version record");
                Ok(())
            }
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(StoreError::Conflict),
            s => Err(StoreError::Status(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwatch_schema::Version;
    use mockito::{Matcher, Server};

    fn store_for(server: &Server, branch: Option<&str>) -> GithubContentsStore {
        GithubContentsStore::new(
            Client::new(),
            &server.url(),
            "acme/state",
            "data/versions.json",
            branch.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn rejects_malformed_repo() {
        for repo in ["acme", "/state", "acme/", "a/b/c"] {
            let err =
                GithubContentsStore::new(Client::new(), "https://api", repo, "v.json", None)
                    .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRepo(_)), "{repo}");
        }
    }

    #[tokio::test]
    async fn test_load_decodes_wrapped_base64() {
        let mut server = Server::new_async().await;
        let encoded = STANDARD.encode(br#"{"111": "1.0", "222": 5}"#);
        let wrapped = format!("{}\n{}\n", &encoded[..10], &encoded[10..]);
        let _m = server
            .mock("GET", "/repos/acme/state/contents/data/versions.json")
            .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
            .with_status(200)
            .with_body(
                serde_json::json!({"content": wrapped, "sha": "abc123", "encoding": "base64"})
                    .to_string(),
            )
            .create_async()
            .await;

        let snapshot = store_for(&server, Some("main")).load().await.unwrap();
        assert_eq!(snapshot.token, Some(ConcurrencyToken::new("abc123")));
        assert_eq!(snapshot.record.get("111"), Some(&Version::from("1.0")));
        assert_eq!(snapshot.record.get("222"), Some(&Version::from(5_u64)));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/acme/state/contents/data/versions.json")
            .with_status(404)
            .create_async()
            .await;

        let snapshot = store_for(&server, None).load().await.unwrap();
        assert!(snapshot.record.is_empty());
        assert!(snapshot.token.is_none());
    }

    #[tokio::test]
    async fn test_load_server_error_fails() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/acme/state/contents/data/versions.json")
            .with_status(500)
            .create_async()
            .await;

        let err = store_for(&server, None).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_save_sends_sha_and_content() {
        let mut server = Server::new_async().await;
        let record: VersionRecord = [("111", "2.0")].into_iter().collect();
        let expected = STANDARD.encode(record.to_json_pretty().unwrap());
        let m = server
            .mock("PUT", "/repos/acme/state/contents/data/versions.json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "message": "Update versions",
                "content": expected,
                "sha": "abc123",
                "branch": "main",
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        store_for(&server, Some("main"))
            .save(&record, Some(&ConcurrencyToken::new("abc123")), "Update versions")
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_save_stale_sha_is_conflict() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/repos/acme/state/contents/data/versions.json")
            .with_status(409)
            .create_async()
            .await;

        let err = store_for(&server, None)
            .save(
                &VersionRecord::new(),
                Some(&ConcurrencyToken::new("old")),
                "Update versions",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }
}
