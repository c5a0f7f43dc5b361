//! Webhook delivery.

pub mod embed;

use appwatch_schema::WebhookMessage;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::NotifyError;

/// Something that can deliver a message to a webhook URL.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, webhook_url: &str, message: &WebhookMessage) -> Result<(), NotifyError>;
}

/// Posts messages as JSON; any 2xx response counts as delivered.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for WebhookClient {
    async fn send(&self, webhook_url: &str, message: &WebhookMessage) -> Result<(), NotifyError> {
        let resp = self.client.post(webhook_url).json(message).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }
        debug!(%status, "Webhook delivered");
        Ok(())
    }
}
