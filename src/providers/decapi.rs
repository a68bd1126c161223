//! Twitch lookups served as plain text by DecAPI.

use crate::error::ProviderError;
use crate::http_client::{join_url, HttpFetcher};

pub fn build_channel_id_url(base_url: &str, channel_name: &str) -> String {
  join_url(base_url, &format!("twitch/id/{}", channel_name.trim()))
}

pub fn build_follower_count_url(base_url: &str, channel_name: &str) -> String {
  join_url(base_url, &format!("twitch/followcount/{}", channel_name.trim()))
}

pub fn build_uptime_url(base_url: &str, channel_name: &str) -> String {
  join_url(base_url, &format!("twitch/uptime/{}", channel_name.trim()))
}

/// Resolves a channel name to the id StreamElements keys its data by.
pub async fn resolve_channel_id(
  fetcher: &HttpFetcher,
  base_url: &str,
  channel_name: &str,
) -> Result<String, ProviderError> {
  let url = build_channel_id_url(base_url, channel_name);
  let resp = fetcher.get(&url).await?.ensure_ok()?;
  let id = resp.text();
  if id.is_empty() {
    return Err(ProviderError::InvalidBody {
      url,
      message: "empty channel id".to_string(),
    });
  }
  Ok(id)
}

pub async fn fetch_follower_count(
  fetcher: &HttpFetcher,
  base_url: &str,
  channel_name: &str,
) -> Result<i64, ProviderError> {
  let url = build_follower_count_url(base_url, channel_name);
  let resp = fetcher.get(&url).await?.ensure_ok()?;
  parse_follower_count(&resp.text()).ok_or_else(|| ProviderError::InvalidBody {
    url,
    message: format!("follower count is not a number: {}", resp.text()),
  })
}

/// The uptime endpoint answers with prose; any status is accepted.
pub async fn fetch_live_status(
  fetcher: &HttpFetcher,
  base_url: &str,
  channel_name: &str,
) -> Result<bool, ProviderError> {
  let url = build_uptime_url(base_url, channel_name);
  let resp = fetcher.get(&url).await?;
  Ok(is_live_from_uptime(&resp.text()))
}

fn parse_follower_count(text: &str) -> Option<i64> {
  let text = text.trim();
  if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  text.parse::<i64>().ok()
}

fn is_live_from_uptime(text: &str) -> bool {
  !text.trim().to_lowercase().contains("offline")
}
