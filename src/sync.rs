use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::Config;
use crate::daily_log::DailyLog;
use crate::error::{Error, Result};
use crate::fetch::{FetchOutcome, FetchedData};
use crate::http_client::HttpFetcher;
use crate::marathon::{marathon_day, MARATHON_DAYS};
use crate::providers::decapi;
use crate::providers::streamelements::{self, ContributorKind};
use crate::stats_merge::{merge_stats, CarryOver, ChannelSnapshot};
use crate::storage;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
  pub channel_id: String,
  pub total_followers: i64,
  pub marathon_followers: i64,
  pub total_subs: i64,
  pub total_bits: i64,
  pub top_sub_gifters: usize,
  pub top_bit_donors: usize,
  pub is_live: bool,
  pub current_day: u32,
  pub new_day: bool,
  pub degraded: Vec<&'static str>,
}

impl fmt::Display for RunSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "ok=true channel_id={} total_followers={} marathon_followers={} total_subs={} total_bits={} top_sub_gifters={} top_bit_donors={} live={} marathon_day={}/{} new_day={} degraded={}",
      self.channel_id,
      self.total_followers,
      self.marathon_followers,
      self.total_subs,
      self.total_bits,
      self.top_sub_gifters,
      self.top_bit_donors,
      self.is_live,
      self.current_day,
      MARATHON_DAYS,
      self.new_day,
      if self.degraded.is_empty() {
        "none".to_string()
      } else {
        self.degraded.join(",")
      },
    )
  }
}

fn note<T>(source: &str, outcome: FetchOutcome<T>) -> FetchOutcome<T> {
  if let Some(err) = outcome.error() {
    warn!(source, error = %err, "fetch failed, using default");
  }
  outcome
}

/// Calls every upstream source once, in order. Only a failed channel id
/// lookup is fatal; everything else degrades to a default.
pub async fn fetch_all(config: &Config, fetcher: &HttpFetcher) -> Result<FetchedData> {
  let channel = config.channel_name.as_str();

  info!("[1/7] Getting channel ID for: {channel}");
  let channel_id = match decapi::resolve_channel_id(fetcher, &config.decapi_base_url, channel).await {
    Ok(id) => id,
    Err(err) => {
      warn!(channel, error = %err, "could not find channel");
      return Err(Error::ChannelNotFound {
        channel: channel.to_string(),
        source: err,
      });
    }
  };
  info!("Channel ID: {channel_id}");

  info!("[2/7] Checking Twitch status...");
  let follower_count = note(
    "followers",
    FetchOutcome::or_default(decapi::fetch_follower_count(fetcher, &config.decapi_base_url, channel).await),
  );
  let is_live = note(
    "live_status",
    FetchOutcome::or_default(decapi::fetch_live_status(fetcher, &config.decapi_base_url, channel).await),
  );
  info!(
    "Followers: {}, stream: {}",
    follower_count.value(),
    if *is_live.value() { "LIVE" } else { "OFFLINE" }
  );

  info!("[3/7] Fetching StreamElements stats...");
  let channel_stats = note(
    "channel_stats",
    FetchOutcome::from_result(
      streamelements::fetch_channel_stats(fetcher, &config.streamelements_base_url, &channel_id).await,
      serde_json::Value::Object(serde_json::Map::new()),
    ),
  );

  info!("[4/7] Fetching top subscribers...");
  let top_subscribers = note(
    "top_subscribers",
    FetchOutcome::or_default(
      streamelements::fetch_top_contributors(
        fetcher,
        &config.streamelements_base_url,
        &channel_id,
        ContributorKind::Subscriber,
      )
      .await,
    ),
  );
  info!("Found {} top subscribers", top_subscribers.value().len());

  info!("[5/7] Fetching top cheers (bits)...");
  let top_cheers = note(
    "top_cheers",
    FetchOutcome::or_default(
      streamelements::fetch_top_contributors(
        fetcher,
        &config.streamelements_base_url,
        &channel_id,
        ContributorKind::Cheer,
      )
      .await,
    ),
  );
  info!("Found {} top cheerers", top_cheers.value().len());

  Ok(FetchedData {
    channel_id,
    follower_count,
    is_live,
    channel_stats,
    top_subscribers,
    top_cheers,
  })
}

/// One full poll: fetch, merge with the previous snapshot, write
/// `stats.json`, then make sure today's entry exists in `daily.json`.
pub async fn run_once(config: &Config, now: DateTime<Utc>) -> Result<RunSummary> {
  let fetcher = HttpFetcher::new(config.timeout);
  let data = fetch_all(config, &fetcher).await?;

  let current_day = marathon_day(config.window.start, now);
  info!("Marathon day: {current_day}/{MARATHON_DAYS}");

  info!("[6/7] Processing data...");
  let snapshot = ChannelSnapshot::from_fetched(&data, current_day);
  let prior = storage::load_object(&config.stats_file())?;
  let carry = CarryOver::from_document(prior.as_ref());
  let stats = merge_stats(&snapshot, &carry, &config.window, now);

  info!("[7/7] Saving data...");
  storage::save_document(&config.stats_file(), &stats)?;
  info!("Saved stats to {}", config.stats_file().display());

  let mut daily = DailyLog::from_document(storage::load_object(&config.daily_file())?);
  let new_day = daily.ensure_day(current_day, now.date_naive());
  storage::save_document(&config.daily_file(), &daily)?;
  info!("Saved daily data to {}", config.daily_file().display());

  Ok(RunSummary {
    channel_id: data.channel_id.clone(),
    total_followers: stats.stats.total_followers,
    marathon_followers: stats.stats.marathon_followers,
    total_subs: stats.stats.total_subs,
    total_bits: stats.stats.total_bits,
    top_sub_gifters: stats.top_sub_gifters.len(),
    top_bit_donors: stats.top_bit_donors.len(),
    is_live: stats.is_live,
    current_day,
    new_day,
    degraded: data.degraded_sources(),
  })
}
