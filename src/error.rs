use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single upstream call. Always recoverable at the run level,
/// except when it happens while resolving the channel id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("request to {url} timed out after {secs}s")]
  Timeout { url: String, secs: u64 },

  #[error("{url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("unexpected response from {url}: {message}")]
  InvalidBody { url: String, message: String },
}

impl ProviderError {
  pub fn status(&self) -> Option<u16> {
    match self {
      ProviderError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

#[derive(Error, Debug)]
pub enum Error {
  #[error("could not resolve channel id for {channel}: {source}")]
  ChannelNotFound {
    channel: String,
    #[source]
    source: ProviderError,
  },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("{0} does not hold a JSON object")]
  NotAnObject(String),

  #[error("invalid timestamp: {0}")]
  InvalidTimestamp(String),
}
