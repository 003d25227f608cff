//! Stub gateways and callback recorders for client tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use weathereye_client::{BrokerConfig, GatewayClient};

/// Serve `app` on an ephemeral loopback port and return its address.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client pointed at `gateway_url`.
pub fn client_for(gateway_url: &str) -> GatewayClient {
    GatewayClient::new(
        BrokerConfig::new()
            .with_gateway_url(gateway_url)
            .with_timeout(Duration::from_secs(10)),
    )
    .unwrap()
}

/// Gateway answering every POST with a fixed reply. Returns its endpoint URL.
pub async fn canned_gateway(
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
) -> String {
    let app = Router::new().route(
        "/gateway",
        post(move || async move {
            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap()
        }),
    );
    format!("{}/gateway", spawn(app).await)
}

/// Gateway whose event-stream body is fed chunk by chunk from the test.
pub struct StreamingGateway {
    pub url: String,
    pub chunks: mpsc::Sender<Bytes>,
    pub hits: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct StreamState {
    receiver: Arc<Mutex<Option<mpsc::Receiver<Bytes>>>>,
    hits: Arc<AtomicUsize>,
}

impl StreamingGateway {
    pub async fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Bytes>(16);
        let hits = Arc::new(AtomicUsize::new(0));
        let state = StreamState {
            receiver: Arc::new(Mutex::new(Some(rx))),
            hits: hits.clone(),
        };

        let app = Router::new()
            .route("/gateway", post(stream_reply))
            .with_state(state);

        Self {
            url: format!("{}/gateway", spawn(app).await),
            chunks: tx,
            hits,
        }
    }

    pub async fn send(&self, chunk: &'static str) {
        self.chunks.send(Bytes::from_static(chunk.as_bytes())).await.unwrap();
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Keep pushing keepalive comments until the server drops the body,
    /// which happens once the client side of the connection is gone.
    pub async fn wait_for_disconnect(&self) -> bool {
        let probe = async {
            while !self.chunks.is_closed() {
                let _ = self.chunks.send(Bytes::from_static(b": ping\n")).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), probe).await.is_ok()
    }
}

async fn stream_reply(State(state): State<StreamState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let Some(rx) = state.receiver.lock().unwrap().take() else {
        return Response::builder()
            .status(StatusCode::GONE)
            .body(Body::empty())
            .unwrap();
    };

    let body = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(body))
        .unwrap()
}

/// Records every callback invocation of a session.
#[derive(Clone, Default)]
pub struct Recorder {
    messages: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn on_message(&self) -> impl FnMut(String) + Send + 'static {
        let messages = self.messages.clone();
        move |event| messages.lock().unwrap().push(event)
    }

    pub fn on_error(&self) -> impl FnOnce(String) + Send + 'static {
        let errors = self.errors.clone();
        move |error| errors.lock().unwrap().push(error)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    /// Poll until at least `count` messages arrived.
    pub async fn wait_for_messages(&self, count: usize) {
        let wait = async {
            while self.messages.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for digest events");
    }
}
