use serde_json::Value;

use crate::error::ProviderError;
use crate::http_client::{join_url, HttpFetcher};

pub const TOP_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorKind {
  Subscriber,
  Cheer,
}

impl ContributorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ContributorKind::Subscriber => "subscriber",
      ContributorKind::Cheer => "cheer",
    }
  }
}

/// Aggregate counters pulled out of the channel stats document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelTotals {
  pub subscribers: i64,
  pub bits: i64,
}

impl ChannelTotals {
  pub fn from_stats(stats: &Value) -> Self {
    Self {
      subscribers: number_at(stats, "/subscribers/count"),
      bits: number_at(stats, "/cheers/amount"),
    }
  }
}

fn number_at(json: &Value, pointer: &str) -> i64 {
  json
    .pointer(pointer)
    .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|n| n as i64)))
    .unwrap_or(0)
}

pub fn build_stats_url(base_url: &str, channel_id: &str) -> String {
  join_url(base_url, &format!("kappa/v2/channels/{}/stats", channel_id.trim()))
}

pub fn build_top_url(base_url: &str, channel_id: &str, kind: ContributorKind) -> String {
  join_url(
    base_url,
    &format!("kappa/v2/channels/{}/top/{}", channel_id.trim(), kind.as_str()),
  )
}

pub async fn fetch_channel_stats(
  fetcher: &HttpFetcher,
  base_url: &str,
  channel_id: &str,
) -> Result<Value, ProviderError> {
  let url = build_stats_url(base_url, channel_id);
  let resp = fetcher.get(&url).await?.ensure_ok()?;
  let json = resp.json()?;
  if !json.is_object() {
    return Err(ProviderError::InvalidBody {
      url,
      message: "stats response is not a JSON object".to_string(),
    });
  }
  Ok(json)
}

/// Raw user records of the top contributors, at most [`TOP_LIMIT`].
pub async fn fetch_top_contributors(
  fetcher: &HttpFetcher,
  base_url: &str,
  channel_id: &str,
  kind: ContributorKind,
) -> Result<Vec<Value>, ProviderError> {
  let url = build_top_url(base_url, channel_id, kind);
  let resp = fetcher.get(&url).await?.ensure_ok()?;
  let json = resp.json()?;
  Ok(
    json
      .get("users")
      .and_then(|v| v.as_array())
      .map(|users| users.iter().take(TOP_LIMIT).cloned().collect())
      .unwrap_or_default(),
  )
}
