use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::MarathonWindow;
use crate::fetch::FetchedData;
use crate::leaderboard::{format_leaderboard, LeaderboardEntry};
use crate::providers::streamelements::ChannelTotals;

/// Fresh values for one run, after formatting and defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSnapshot {
  pub channel_id: String,
  pub follower_count: i64,
  pub is_live: bool,
  pub current_day: u32,
  pub total_subs: i64,
  pub total_bits: i64,
  pub top_sub_gifters: Vec<LeaderboardEntry>,
  pub top_bit_donors: Vec<LeaderboardEntry>,
}

impl ChannelSnapshot {
  pub fn from_fetched(data: &FetchedData, current_day: u32) -> Self {
    let totals = ChannelTotals::from_stats(data.channel_stats.value());
    Self {
      channel_id: data.channel_id.clone(),
      follower_count: *data.follower_count.value(),
      is_live: *data.is_live.value(),
      current_day,
      total_subs: totals.subscribers,
      total_bits: totals.bits,
      top_sub_gifters: format_leaderboard(data.top_subscribers.value(), "amount"),
      top_bit_donors: format_leaderboard(data.top_cheers.value(), "amount"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBlock {
  pub total_followers: i64,
  pub marathon_followers: i64,
  pub marathon_start_followers: i64,
  pub total_subs: i64,
  /// Maintained by other tooling; passed through verbatim.
  pub marathon_subs: Value,
  pub total_bits: i64,
}

/// The `stats.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedStats {
  pub last_updated: String,
  pub marathon_start: String,
  pub marathon_end: String,
  pub current_day: u32,
  pub is_live: bool,
  pub stats: StatsBlock,
  pub top_sub_gifters: Vec<LeaderboardEntry>,
  pub top_bit_donors: Vec<LeaderboardEntry>,
  /// Written by other tooling; passed through verbatim.
  pub top_chatters: Vec<Value>,
}

/// Fields the previous `stats.json` contributes to the next one. `None`
/// means the prior document did not record the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarryOver {
  pub marathon_start_followers: Option<i64>,
  pub marathon_subs: Option<Value>,
  pub top_chatters: Option<Vec<Value>>,
}

fn integer(value: &Value) -> Option<i64> {
  value.as_i64().or_else(|| value.as_f64().map(|n| n as i64))
}

impl CarryOver {
  pub fn from_document(doc: Option<&Value>) -> Self {
    let Some(doc) = doc else {
      return Self::default();
    };

    // Older snapshots kept the baseline at the top level.
    let marathon_start_followers = doc
      .pointer("/stats/marathonStartFollowers")
      .or_else(|| doc.get("marathonStartFollowers"))
      .and_then(integer);

    let marathon_subs = doc.pointer("/stats/marathonSubs").cloned();

    let top_chatters = doc
      .get("topChatters")
      .and_then(|v| v.as_array())
      .cloned();

    Self {
      marathon_start_followers,
      marathon_subs,
      top_chatters,
    }
  }
}

/// `+00:00` offset, with microseconds only when they are non-zero.
fn iso_timestamp(now: DateTime<Utc>) -> String {
  let precision = if now.timestamp_subsec_micros() == 0 {
    SecondsFormat::Secs
  } else {
    SecondsFormat::Micros
  };
  now.to_rfc3339_opts(precision, false)
}

/// Builds the next `stats.json` from this run's snapshot and the prior one.
///
/// The first run (no recorded baseline) pins `marathonStartFollowers` to the
/// current follower count. Later runs keep that baseline and report the
/// difference, which goes negative if the channel loses followers.
/// `marathonSubs` and `topChatters` pass through from the prior document;
/// both leaderboards are replaced outright.
pub fn merge_stats(
  snapshot: &ChannelSnapshot,
  prior: &CarryOver,
  window: &MarathonWindow,
  now: DateTime<Utc>,
) -> PersistedStats {
  let (marathon_start_followers, marathon_followers) = match prior.marathon_start_followers {
    Some(baseline) => (baseline, snapshot.follower_count - baseline),
    None => (snapshot.follower_count, 0),
  };

  PersistedStats {
    last_updated: iso_timestamp(now),
    marathon_start: window.start_rfc3339(),
    marathon_end: window.end_rfc3339(),
    current_day: snapshot.current_day,
    is_live: snapshot.is_live,
    stats: StatsBlock {
      total_followers: snapshot.follower_count,
      marathon_followers,
      marathon_start_followers,
      total_subs: snapshot.total_subs,
      marathon_subs: prior.marathon_subs.clone().unwrap_or_else(|| json!(0)),
      total_bits: snapshot.total_bits,
    },
    top_sub_gifters: snapshot.top_sub_gifters.clone(),
    top_bit_donors: snapshot.top_bit_donors.clone(),
    top_chatters: prior.top_chatters.clone().unwrap_or_default(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ProviderError;
  use crate::fetch::FetchOutcome;
  use chrono::TimeZone;
  use serde_json::json;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 29, 12, 30, 0).unwrap()
  }

  fn snapshot(follower_count: i64) -> ChannelSnapshot {
    ChannelSnapshot {
      channel_id: "123".to_string(),
      follower_count,
      is_live: true,
      current_day: 3,
      total_subs: 10,
      total_bits: 200,
      top_sub_gifters: vec![LeaderboardEntry {
        username: "b".to_string(),
        amount: 7,
      }],
      top_bit_donors: Vec::new(),
    }
  }

  #[test]
  fn first_run_establishes_baseline() {
    let out = merge_stats(&snapshot(500), &CarryOver::from_document(None), &MarathonWindow::default(), now());
    assert_eq!(out.stats.marathon_start_followers, 500);
    assert_eq!(out.stats.marathon_followers, 0);
    assert_eq!(out.stats.total_followers, 500);
    assert_eq!(out.stats.marathon_subs, json!(0));
    assert!(out.top_chatters.is_empty());
  }

  #[test]
  fn later_run_reports_delta_against_baseline() {
    let prior = json!({"stats": {"marathonStartFollowers": 500, "marathonFollowers": 12}});
    let carry = CarryOver::from_document(Some(&prior));
    let out = merge_stats(&snapshot(530), &carry, &MarathonWindow::default(), now());
    assert_eq!(out.stats.marathon_followers, 30);
    assert_eq!(out.stats.marathon_start_followers, 500);
  }

  #[test]
  fn follower_loss_yields_negative_delta() {
    let prior = json!({"stats": {"marathonStartFollowers": 500}});
    let carry = CarryOver::from_document(Some(&prior));
    let out = merge_stats(&snapshot(480), &carry, &MarathonWindow::default(), now());
    assert_eq!(out.stats.marathon_followers, -20);
  }

  #[test]
  fn prior_without_baseline_is_treated_as_first_run() {
    let prior = json!({"stats": {"totalFollowers": 400, "marathonSubs": 4}});
    let carry = CarryOver::from_document(Some(&prior));
    let out = merge_stats(&snapshot(530), &carry, &MarathonWindow::default(), now());
    assert_eq!(out.stats.marathon_start_followers, 530);
    assert_eq!(out.stats.marathon_followers, 0);
    assert_eq!(out.stats.marathon_subs, json!(4));
  }

  #[test]
  fn accepts_top_level_baseline() {
    let prior = json!({"marathonStartFollowers": 450});
    let carry = CarryOver::from_document(Some(&prior));
    assert_eq!(carry.marathon_start_followers, Some(450));
  }

  #[test]
  fn carries_marathon_subs_and_chatters_verbatim() {
    let prior = json!({
      "stats": {"marathonStartFollowers": 1, "marathonSubs": 17},
      "topChatters": [{"username": "x", "amount": 5}],
      "topSubGifters": [{"username": "old", "amount": 99}]
    });
    let carry = CarryOver::from_document(Some(&prior));
    let out = merge_stats(&snapshot(1), &carry, &MarathonWindow::default(), now());

    assert_eq!(out.stats.marathon_subs, json!(17));
    assert_eq!(out.top_chatters, vec![json!({"username": "x", "amount": 5})]);
    // Leaderboards are replaced, not merged with history.
    assert_eq!(out.top_sub_gifters, snapshot(1).top_sub_gifters);
  }

  #[test]
  fn marathon_subs_of_any_shape_passes_through() {
    for recorded in [json!(6.5), json!("12"), json!(null), json!(-3)] {
      let prior = json!({"stats": {"marathonStartFollowers": 1, "marathonSubs": recorded.clone()}});
      let carry = CarryOver::from_document(Some(&prior));
      let out = merge_stats(&snapshot(1), &carry, &MarathonWindow::default(), now());
      assert_eq!(out.stats.marathon_subs, recorded);
      assert_eq!(serde_json::to_value(&out).unwrap()["stats"]["marathonSubs"], recorded);
    }
  }

  #[test]
  fn update_time_keeps_sub_second_precision_when_present() {
    let at = now() + chrono::TimeDelta::microseconds(250_500);
    let out = merge_stats(&snapshot(1), &CarryOver::default(), &MarathonWindow::default(), at);
    assert_eq!(out.last_updated, "2025-10-29T12:30:00.250500+00:00");
  }

  #[test]
  fn stamps_window_and_update_time() {
    let out = merge_stats(&snapshot(1), &CarryOver::default(), &MarathonWindow::default(), now());
    assert_eq!(out.last_updated, "2025-10-29T12:30:00+00:00");
    assert_eq!(out.marathon_start, "2025-10-27T00:00:00Z");
    assert_eq!(out.marathon_end, "2025-11-24T00:00:00Z");
    assert_eq!(out.current_day, 3);
    assert!(out.is_live);
  }

  #[test]
  fn serializes_with_camel_case_keys_in_document_order() {
    let out = merge_stats(&snapshot(1), &CarryOver::default(), &MarathonWindow::default(), now());
    let value = serde_json::to_value(&out).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(
      keys,
      vec![
        "lastUpdated",
        "marathonStart",
        "marathonEnd",
        "currentDay",
        "isLive",
        "stats",
        "topSubGifters",
        "topBitDonors",
        "topChatters"
      ]
    );
    assert_eq!(value["stats"]["marathonStartFollowers"], 1);
  }

  #[test]
  fn snapshot_defaults_degraded_sources() {
    let timeout = ProviderError::Timeout {
      url: "http://x/".to_string(),
      secs: 10,
    };
    let data = FetchedData {
      channel_id: "123".to_string(),
      follower_count: FetchOutcome::Fetched(1000),
      is_live: FetchOutcome::or_default(Err(timeout.clone())),
      channel_stats: FetchOutcome::Fetched(json!({"subscribers": {"count": 10}, "cheers": {"amount": 200}})),
      top_subscribers: FetchOutcome::Fetched(vec![
        json!({"name": "a", "amount": 3}),
        json!({"name": "b", "amount": 7}),
      ]),
      top_cheers: FetchOutcome::or_default(Err(timeout)),
    };

    let snap = ChannelSnapshot::from_fetched(&data, 5);
    assert_eq!(snap.follower_count, 1000);
    assert!(!snap.is_live);
    assert_eq!(snap.total_subs, 10);
    assert_eq!(snap.total_bits, 200);
    assert_eq!(snap.current_day, 5);
    assert_eq!(snap.top_sub_gifters[0].username, "b");
    assert!(snap.top_bit_donors.is_empty());
  }
}
