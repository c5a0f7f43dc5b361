//! Notification layouts for the two checks.

use appwatch_schema::{AppSummary, Embed, UpdateEvent, WebhookMessage, chat_timestamp};
use chrono::{DateTime, Utc};

pub const FOOTER_TEXT: &str = "Meta Update Checker";
pub const SUMMARY_COLOR: u32 = 5_814_783;
pub const UPDATE_COLOR: u32 = 3_447_003;

/// Message posted by an ad-hoc check.
pub fn summary_message(
    summary: &AppSummary,
    released_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> WebhookMessage {
    let embed = Embed::new("Update Checker", SUMMARY_COLOR)
        .description(format!("**{}** has a new update", summary.app_name))
        .field("App Name", &summary.app_name, true)
        .field("App ID", &summary.app_id, true)
        .field("Version", &summary.version_string, true)
        .field("Version Code", summary.version_code.to_string(), true)
        .field("File Size", &summary.file_size, true)
        .field("Release Date", chat_timestamp(released_at.timestamp()), false)
        .footer(FOOTER_TEXT)
        .timestamp(now);
    WebhookMessage::from_embed(embed)
}

/// Message posted by the persistent check for one detected update.
pub fn update_message(
    event: &UpdateEvent,
    released_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> WebhookMessage {
    let name = event.app_name.as_deref().unwrap_or(&event.app_id);
    let previous = event
        .previous_version
        .as_ref()
        .map_or_else(|| "N/A".to_string(), ToString::to_string);

    let mut embed = Embed::new("App Update Detected", UPDATE_COLOR)
        .description(format!("**{name}** has been updated!"))
        .field("App ID", format!("`{}`", event.app_id), false)
        .field("Previous Version", format!("`{previous}`"), true)
        .field("New Version", format!("`{}`", event.version), true);
    if let Some(ts) = released_at {
        embed = embed.field("Release Date", chat_timestamp(ts.timestamp()), false);
    }
    let embed = embed
        .field("Changelog", &event.changelog, false)
        .footer(FOOTER_TEXT)
        .timestamp(now);
    WebhookMessage::from_embed(embed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwatch_schema::{Version, from_epoch_seconds};

    #[test]
    fn summary_lists_store_fields() {
        let summary = AppSummary {
            app_id: "42".into(),
            app_name: "Demo".into(),
            version_code: Version::from(9_u64),
            version_string: "1.0.9".into(),
            release_date: "2023-11-14T22:13:20.000Z".into(),
            file_size: "2.00 GB".into(),
        };
        let released = from_epoch_seconds(1_700_000_000).unwrap();
        let message = summary_message(&summary, released, released);

        let embed = &message.embeds[0];
        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["App Name", "App ID", "Version", "Version Code", "File Size", "Release Date"]
        );
        assert_eq!(embed.fields[3].value, "9");
        assert_eq!(embed.fields[5].value, "<t:1700000000:F>");
        assert_eq!(embed.color, SUMMARY_COLOR);
    }

    #[test]
    fn update_shows_previous_or_na() {
        let mut event = UpdateEvent {
            app_id: "7".into(),
            app_name: None,
            version: Version::from("2"),
            previous_version: None,
            release_date: None,
            changelog: "No changelog provided.".into(),
        };
        let now = Utc::now();

        let first = update_message(&event, None, now);
        let embed = &first.embeds[0];
        assert_eq!(embed.description.as_deref(), Some("**7** has been updated!"));
        assert_eq!(embed.fields[1].value, "`N/A`");
        assert!(embed.fields.iter().all(|f| f.name != "Release Date"));

        event.previous_version = Some(Version::from("1"));
        event.app_name = Some("Seven".into());
        let changed = update_message(&event, from_epoch_seconds(10), now);
        let embed = &changed.embeds[0];
        assert_eq!(embed.fields[1].value, "`1`");
        assert!(embed.fields.iter().any(|f| f.value == "<t:10:F>"));
        assert_eq!(embed.fields.last().unwrap().value, "No changelog provided.");
    }
}
