use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Nominatim rejects anonymous clients, so every request identifies the app.
pub const USER_AGENT: &str = concat!("skywatch/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all providers.
pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` with `query`, fail on non-success status, decode the JSON body.
///
/// `what` names the request in error messages, e.g. "Open-Meteo forecast".
pub async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
    what: &str,
) -> Result<T> {
    tracing::debug!(%url, ?query, "Requesting {what}");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Failed to send {what} request"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        tracing::warn!(%status, "{what} request failed");
        return Err(anyhow!(
            "{what} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
