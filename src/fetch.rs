use serde_json::Value;

use crate::error::ProviderError;

/// Result of a best-effort upstream call: either the fetched value or the
/// default substituted after a soft failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
  Fetched(T),
  Degraded { value: T, error: ProviderError },
}

impl<T> FetchOutcome<T> {
  pub fn from_result(result: Result<T, ProviderError>, default: T) -> Self {
    match result {
      Ok(value) => FetchOutcome::Fetched(value),
      Err(error) => FetchOutcome::Degraded { value: default, error },
    }
  }

  pub fn value(&self) -> &T {
    match self {
      FetchOutcome::Fetched(value) => value,
      FetchOutcome::Degraded { value, .. } => value,
    }
  }

  pub fn error(&self) -> Option<&ProviderError> {
    match self {
      FetchOutcome::Fetched(_) => None,
      FetchOutcome::Degraded { error, .. } => Some(error),
    }
  }

  pub fn is_degraded(&self) -> bool {
    self.error().is_some()
  }
}

impl<T: Default> FetchOutcome<T> {
  pub fn or_default(result: Result<T, ProviderError>) -> Self {
    Self::from_result(result, T::default())
  }
}

/// Everything one run pulls from upstream, before any processing.
#[derive(Debug, Clone)]
pub struct FetchedData {
  pub channel_id: String,
  pub follower_count: FetchOutcome<i64>,
  pub is_live: FetchOutcome<bool>,
  pub channel_stats: FetchOutcome<Value>,
  pub top_subscribers: FetchOutcome<Vec<Value>>,
  pub top_cheers: FetchOutcome<Vec<Value>>,
}

impl FetchedData {
  /// Names of the sources that fell back to a default this run.
  pub fn degraded_sources(&self) -> Vec<&'static str> {
    let mut out = Vec::new();
    if self.follower_count.is_degraded() {
      out.push("followers");
    }
    if self.is_live.is_degraded() {
      out.push("live_status");
    }
    if self.channel_stats.is_degraded() {
      out.push("channel_stats");
    }
    if self.top_subscribers.is_degraded() {
      out.push("top_subscribers");
    }
    if self.top_cheers.is_degraded() {
      out.push("top_cheers");
    }
    out
  }
}
