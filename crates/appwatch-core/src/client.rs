//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::header;

use crate::error::ConfigError;

/// Build a client with a fixed user agent, optional bearer token and a
/// per-request timeout.
pub fn build_client(
    user_agent: &str,
    token: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, ConfigError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(user_agent)?,
    );

    if let Some(t) = token {
        let mut value = header::HeaderValue::from_str(&format!("Bearer {t}"))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}
