use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{AppDetails, LatestBinary, MetadataSource};
use crate::config::UpstreamConfig;
use crate::error::UpstreamError;

/// Fields requested from the application graph for the persistent check.
const LATEST_BINARY_FIELDS: &str =
    "id,display_name,latest_supported_binary{id,version,change_log,created_date}";

#[derive(Deserialize, Debug)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
}

#[derive(Deserialize, Debug)]
struct GraphQlData {
    node: Option<AppDetails>,
}

#[derive(Deserialize, Debug)]
struct AppNode {
    #[serde(default, alias = "latestSupportedBinary")]
    latest_supported_binary: Option<LatestBinary>,
}

/// HTTP client for the application graph.
///
/// Ad-hoc lookups go through the persisted GraphQL store query
/// (`doc_id`); persistent checks read the application node directly.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    graphql_url: String,
    graph_url: String,
    doc_id: String,
    access_token: Option<String>,
}

impl GraphClient {
    pub fn new(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            graphql_url: config.graphql_url.clone(),
            graph_url: config.graph_url.trim_end_matches('/').to_string(),
            doc_id: config.doc_id.clone(),
            access_token: config.access_token.clone(),
        }
    }
}

#[async_trait]
impl MetadataSource for GraphClient {
    async fn app_details(&self, app_id: &str) -> Result<Option<AppDetails>, UpstreamError> {
        let variables = serde_json::json!({
            "applicationID": app_id,
            "hmdType": "HOLLYWOOD",
            "firstStoreItems": 1,
            "releaseChannels": ["LIVE"],
        })
        .to_string();

        let resp = self
            .client
            .get(&self.graphql_url)
            .query(&[
                ("forced_locale", "en_US"),
                ("doc_id", self.doc_id.as_str()),
                ("variables", variables.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status()));
        }

        let body: GraphQlResponse = resp.json().await?;
        let node = body.data.and_then(|d| d.node);
        debug!(app_id, found = node.is_some(), "Fetched app details");
        Ok(node)
    }

    async fn latest_binary(&self, app_id: &str) -> Result<Option<LatestBinary>, UpstreamError> {
        let url = format!("{}/{}", self.graph_url, app_id);
        let mut req = self
            .client
            .get(&url)
            .query(&[("fields", LATEST_BINARY_FIELDS)]);
        if let Some(token) = &self.access_token {
            req = req.query(&[("access_token", token.as_str())]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status()));
        }

        let node: AppNode = resp.json().await?;
        debug!(
            app_id,
            found = node.latest_supported_binary.is_some(),
            "Fetched latest binary"
        );
        Ok(node.latest_supported_binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwatch_schema::Version;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server, token: Option<&str>) -> GraphClient {
        let config = UpstreamConfig {
            graphql_url: format!("{}/graphql", server.url()),
            graph_url: server.url(),
            access_token: token.map(str::to_string),
            ..UpstreamConfig::default()
        };
        GraphClient::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn test_app_details_parses_node() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/graphql")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("doc_id".into(), "5303836509676156".into()),
                Matcher::UrlEncoded("forced_locale".into(), "en_US".into()),
                Matcher::Regex("applicationID".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {"node": {
                    "displayName": "Demo",
                    "primaryBinary": {"version": 77, "versionString": "1.4.0",
                                      "created_date": 1700000000, "size": 1073741824}
                }}}"#,
            )
            .create_async()
            .await;

        let details = client_for(&server, None)
            .app_details("123")
            .await
            .unwrap()
            .expect("node");

        m.assert_async().await;
        assert_eq!(details.display_name.as_deref(), Some("Demo"));
        let binary = details.primary_binary.unwrap();
        assert_eq!(binary.version, Some(Version::from(77_u64)));
        assert_eq!(binary.size, Some(1_073_741_824));
    }

    #[tokio::test]
    async fn test_app_details_missing_node_is_none() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/graphql")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": {"node": null}}"#)
            .create_async()
            .await;

        let details = client_for(&server, None).app_details("404").await.unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_app_details_error_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/graphql")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server, None).app_details("1").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_latest_binary_sends_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/555")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("access_token".into(), "tok".into()),
                Matcher::UrlEncoded("fields".into(), LATEST_BINARY_FIELDS.into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"id": "555", "latest_supported_binary":
                    {"version": "3.1", "change_log": "New map", "created_date": 1700000000}}"#,
            )
            .create_async()
            .await;

        let binary = client_for(&server, Some("tok"))
            .latest_binary("555")
            .await
            .unwrap()
            .expect("binary");

        m.assert_async().await;
        assert_eq!(binary.version, Version::from("3.1"));
        assert_eq!(binary.change_log.as_deref(), Some("New map"));
    }

    #[tokio::test]
    async fn test_latest_binary_absent_is_none() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/555")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id": "555"}"#)
            .create_async()
            .await;

        let binary = client_for(&server, None).latest_binary("555").await.unwrap();
        assert!(binary.is_none());
    }
}
