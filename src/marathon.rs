use chrono::{DateTime, Utc};

pub const MARATHON_DAYS: i64 = 28;

const SECONDS_PER_DAY: i64 = 86_400;

/// 1-based marathon day for `now`, clamped to `1..=MARATHON_DAYS`.
pub fn marathon_day(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
  let elapsed_days = (now - start).num_seconds().div_euclid(SECONDS_PER_DAY);
  (elapsed_days + 1).clamp(1, MARATHON_DAYS) as u32
}

pub fn day_key(day: u32) -> String {
  format!("day{day}")
}
