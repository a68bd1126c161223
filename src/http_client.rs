use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{ACCEPT, USER_AGENT};
use hyper::{Method, Request, StatusCode};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

use crate::error::ProviderError;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

#[derive(Debug)]
pub struct HttpResponse {
  pub url: String,
  pub status: StatusCode,
  pub body: Bytes,
}

impl HttpResponse {
  pub fn ensure_ok(self) -> Result<Self, ProviderError> {
    if self.status != StatusCode::OK {
      return Err(ProviderError::Status {
        url: self.url,
        status: self.status.as_u16(),
      });
    }
    Ok(self)
  }

  pub fn text(&self) -> String {
    String::from_utf8_lossy(&self.body).trim().to_string()
  }

  pub fn json(&self) -> Result<Value, ProviderError> {
    serde_json::from_slice::<Value>(&self.body).map_err(|e| ProviderError::InvalidBody {
      url: self.url.clone(),
      message: format!("invalid json response: {e}"),
    })
  }
}

/// Plain GET client shared by every provider call of a run.
#[derive(Clone)]
pub struct HttpFetcher {
  client: HttpsClient,
  timeout: Duration,
}

impl HttpFetcher {
  pub fn new(timeout: Duration) -> Self {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
      .with_webpki_roots()
      .https_or_http()
      .enable_http1()
      .build();

    let client = Client::builder(TokioExecutor::new()).build(connector);

    Self { client, timeout }
  }

  pub async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
    let req = Request::builder()
      .method(Method::GET)
      .uri(url)
      .header(ACCEPT, "application/json, text/plain")
      .header(USER_AGENT, "stream-marathon-stats")
      .body(Empty::<Bytes>::new())
      .map_err(|e| ProviderError::Transport {
        url: url.to_string(),
        message: e.to_string(),
      })?;

    let exchange = async {
      let resp = self
        .client
        .request(req)
        .await
        .map_err(|e| ProviderError::Transport {
          url: url.to_string(),
          message: e.to_string(),
        })?;

      let status = resp.status();
      let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| ProviderError::Transport {
          url: url.to_string(),
          message: e.to_string(),
        })?
        .to_bytes();

      Ok::<_, ProviderError>(HttpResponse {
        url: url.to_string(),
        status,
        body,
      })
    };

    match tokio::time::timeout(self.timeout, exchange).await {
      Ok(result) => result,
      Err(_) => Err(ProviderError::Timeout {
        url: url.to_string(),
        secs: self.timeout.as_secs(),
      }),
    }
  }
}

/// Joins a base URL and a path without doubling or dropping the slash.
pub fn join_url(base_url: &str, path: &str) -> String {
  let base = base_url.trim_end_matches('/');
  let path = path.trim_start_matches('/');
  format!("{base}/{path}")
}
