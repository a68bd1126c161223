use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::error::{Error, Result};
use crate::marathon::MARATHON_DAYS;

pub const DEFAULT_CHANNEL_NAME: &str = "marlon";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MARATHON_START: &str = "2025-10-27T00:00:00Z";
pub const DEFAULT_MARATHON_END: &str = "2025-11-24T00:00:00Z";
/// `DEFAULT_MARATHON_START` as seconds since the epoch.
const DEFAULT_MARATHON_START_EPOCH_SECS: i64 = 1_761_523_200;
pub const DEFAULT_DECAPI_BASE_URL: &str = "https://decapi.me/";
pub const DEFAULT_STREAMELEMENTS_BASE_URL: &str = "https://api.streamelements.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fixed event window the day index is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarathonWindow {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

impl MarathonWindow {
  pub fn parse(start: &str, end: &str) -> Result<Self> {
    Ok(Self {
      start: parse_utc(start)?,
      end: parse_utc(end)?,
    })
  }

  pub fn start_rfc3339(&self) -> String {
    self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
  }

  pub fn end_rfc3339(&self) -> String {
    self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
  }
}

impl Default for MarathonWindow {
  fn default() -> Self {
    let start = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(DEFAULT_MARATHON_START_EPOCH_SECS);
    Self {
      start,
      end: start + TimeDelta::days(MARATHON_DAYS),
    }
  }
}

pub fn parse_utc(input: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(input.trim())
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::InvalidTimestamp(format!("{input}: {e}")))
}

#[derive(Debug, Clone)]
pub struct Config {
  pub channel_name: String,
  pub data_dir: PathBuf,
  pub window: MarathonWindow,
  pub decapi_base_url: String,
  pub streamelements_base_url: String,
  pub timeout: Duration,
}

impl Config {
  pub fn new(channel_name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
    Self {
      channel_name: channel_name.into(),
      data_dir: data_dir.into(),
      window: MarathonWindow::default(),
      decapi_base_url: DEFAULT_DECAPI_BASE_URL.to_string(),
      streamelements_base_url: DEFAULT_STREAMELEMENTS_BASE_URL.to_string(),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
  }

  pub fn with_window(mut self, window: MarathonWindow) -> Self {
    self.window = window;
    self
  }

  pub fn with_base_urls(mut self, decapi: impl Into<String>, streamelements: impl Into<String>) -> Self {
    self.decapi_base_url = decapi.into();
    self.streamelements_base_url = streamelements.into();
    self
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn stats_file(&self) -> PathBuf {
    self.data_dir.join("stats.json")
  }

  pub fn daily_file(&self) -> PathBuf {
    self.data_dir.join("daily.json")
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new(DEFAULT_CHANNEL_NAME, DEFAULT_DATA_DIR)
  }
}
