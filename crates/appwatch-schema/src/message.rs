//! Chat-embed webhook message format.
//!
//! Mirrors the embed object accepted by Discord-compatible webhooks. Only the
//! fields the checks emit are modelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::format_timestamp;

/// Top-level body posted to a webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookMessage {
    /// Override for the poster's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Override for the poster's avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Rich embeds; the checks always send exactly one.
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// Wrap a single embed.
    pub fn from_embed(embed: Embed) -> Self {
        Self {
            username: None,
            avatar_url: None,
            embeds: vec![embed],
        }
    }

    /// Set the poster identity overrides.
    pub fn with_identity(mut self, username: Option<String>, avatar_url: Option<String>) -> Self {
        self.username = username;
        self.avatar_url = avatar_url;
        self
    }
}

/// A single rich embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    /// Bold heading.
    pub title: String,
    /// Markdown body below the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sidebar colour as a 24-bit RGB integer.
    pub color: u32,
    /// Name/value pairs.
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    /// Small text at the bottom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    /// ISO 8601 timestamp shown next to the footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Embed {
    /// Start an embed with a title and colour.
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer text.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Set the timestamp.
    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(format_timestamp(ts));
        self
    }
}

/// A name/value pair inside an [`Embed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    #[serde(default)]
    pub inline: bool,
}

/// Footer of an [`Embed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

/// Chat markup that renders an epoch timestamp in the reader's locale.
pub fn chat_timestamp(epoch_secs: i64) -> String {
    format!("<t:{epoch_secs}:F>")
}
