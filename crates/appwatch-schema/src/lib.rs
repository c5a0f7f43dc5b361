//! Shared types and wire format for appwatch.
//!
//! The version record persisted between runs, the events produced by the
//! two checks, and the webhook message they post all live here so that the
//! core library and the service agree on a single representation.

pub mod event;
pub mod format;
pub mod message;
pub mod version;

// Re-exports
pub use event::{AppSummary, UpdateEvent};
pub use format::*;
pub use message::{Embed, EmbedField, EmbedFooter, WebhookMessage, chat_timestamp};
pub use version::{Observation, RecordError, Version, VersionRecord};
