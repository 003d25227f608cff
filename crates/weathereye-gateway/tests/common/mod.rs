//! Stub upstream API for gateway integration tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::Response;
use tokio::net::TcpListener;

/// A request the stub upstream received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// Canned reply plus a log of everything the stub saw.
#[derive(Clone)]
pub struct StubUpstream {
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubUpstream {
    pub fn new(status: StatusCode, content_type: &'static str, body: &'static str) -> Self {
        Self {
            status,
            content_type,
            body,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn json(status: StatusCode, body: &'static str) -> Self {
        Self::new(status, "application/json", body)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral loopback port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(reply).with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }
}

async fn reply(
    State(stub): State<StubUpstream>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.requests.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    Response::builder()
        .status(stub.status)
        .header(header::CONTENT_TYPE, stub.content_type)
        .body(Body::from(stub.body))
        .unwrap()
}

/// Base URL nothing listens on.
pub async fn dead_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}
