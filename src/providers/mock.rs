use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-process HTTP server answering fixed bodies by request path.
pub(crate) struct MockServer {
  pub base_url: String,
  hits: Arc<Mutex<Vec<String>>>,
  task: JoinHandle<()>,
}

impl MockServer {
  pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
    let routes: HashMap<String, (u16, String)> = routes
      .iter()
      .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
      .collect();
    let routes = Arc::new(routes);
    let hits = Arc::new(Mutex::new(Vec::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let task_hits = hits.clone();
    let task = tokio::spawn(async move {
      loop {
        let Ok((stream, _)) = listener.accept().await else {
          return;
        };
        let routes = routes.clone();
        let hits = task_hits.clone();
        tokio::spawn(async move {
          let io = TokioIo::new(stream);
          let _ = http1::Builder::new()
            .serve_connection(
              io,
              service_fn(move |req: Request<Incoming>| {
                let routes = routes.clone();
                let hits = hits.clone();
                async move {
                  let path = req.uri().path().to_string();
                  hits.lock().unwrap().push(path.clone());
                  let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, "not found".to_string()));
                  Ok::<_, hyper::Error>(
                    Response::builder()
                      .status(StatusCode::from_u16(status).unwrap())
                      .body(Full::new(Bytes::from(body)))
                      .unwrap(),
                  )
                }
              }),
            )
            .await;
        });
      }
    });

    Self {
      base_url: format!("http://{addr}/"),
      hits,
      task,
    }
  }

  pub fn hits(&self) -> Vec<String> {
    self.hits.lock().unwrap().clone()
  }
}

impl Drop for MockServer {
  fn drop(&mut self) {
    self.task.abort();
  }
}
