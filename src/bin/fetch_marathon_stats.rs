use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stream_marathon_stats::config::{
  Config, MarathonWindow, DEFAULT_CHANNEL_NAME, DEFAULT_DATA_DIR, DEFAULT_DECAPI_BASE_URL,
  DEFAULT_MARATHON_END, DEFAULT_MARATHON_START, DEFAULT_STREAMELEMENTS_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use stream_marathon_stats::error::Error;
use stream_marathon_stats::sync::run_once;

/// Poll the channel once and update stats.json and daily.json.
#[derive(Parser, Debug)]
#[command(name = "fetch_marathon_stats", version)]
struct Cli {
  /// Twitch channel name
  #[arg(long = "channel", env = "TWITCH_CHANNEL_NAME", default_value = DEFAULT_CHANNEL_NAME)]
  channel: String,

  /// Directory holding stats.json and daily.json
  #[arg(long = "data-dir", env = "MARATHON_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
  data_dir: PathBuf,

  /// Marathon start (RFC 3339)
  #[arg(long = "marathon-start", env = "MARATHON_START", default_value = DEFAULT_MARATHON_START)]
  marathon_start: String,

  /// Marathon end (RFC 3339)
  #[arg(long = "marathon-end", env = "MARATHON_END", default_value = DEFAULT_MARATHON_END)]
  marathon_end: String,

  #[arg(long = "decapi-base-url", env = "DECAPI_BASE_URL", default_value = DEFAULT_DECAPI_BASE_URL)]
  decapi_base_url: String,

  #[arg(
    long = "streamelements-base-url",
    env = "STREAMELEMENTS_BASE_URL",
    default_value = DEFAULT_STREAMELEMENTS_BASE_URL
  )]
  streamelements_base_url: String,

  /// Per-request timeout in seconds
  #[arg(long = "timeout-secs", env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
  timeout_secs: u64,

  /// Debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn init_tracing(verbose: bool) {
  let default = if verbose {
    "stream_marathon_stats=debug,fetch_marathon_stats=debug"
  } else {
    "info"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let window = MarathonWindow::parse(&cli.marathon_start, &cli.marathon_end)?;
  let config = Config::new(cli.channel, cli.data_dir)
    .with_window(window)
    .with_base_urls(cli.decapi_base_url, cli.streamelements_base_url)
    .with_timeout(Duration::from_secs(cli.timeout_secs));

  match run_once(&config, Utc::now()).await {
    Ok(summary) => {
      println!("{summary}");
      Ok(())
    }
    Err(Error::ChannelNotFound { channel, source }) => {
      eprintln!("Could not find channel: {channel} ({source})");
      Ok(())
    }
    Err(err) => Err(err.into()),
  }
}
