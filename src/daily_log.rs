use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::marathon::day_key;

/// Seed record for a day seen for the first time.
pub fn empty_day_record(date: NaiveDate) -> Value {
  json!({
    "date": date.format("%Y-%m-%d").to_string(),
    "subGifters": [],
    "bitDonors": [],
    "chatters": [],
  })
}

/// The `daily.json` document: `"day<N>"` keys in insertion order. Existing
/// entries are kept as raw JSON so they round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog(Map<String, Value>);

impl DailyLog {
  pub fn from_document(doc: Option<Value>) -> Self {
    match doc {
      Some(Value::Object(map)) => Self(map),
      _ => Self::default(),
    }
  }

  /// Inserts an empty record for `day` unless one exists. Returns whether
  /// the log grew.
  pub fn ensure_day(&mut self, day: u32, today: NaiveDate) -> bool {
    let key = day_key(day);
    if self.0.contains_key(&key) {
      return false;
    }
    self.0.insert(key, empty_day_record(today));
    true
  }
}
