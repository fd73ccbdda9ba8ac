//! Local stand-ins for the completion API and the relay server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone)]
struct UpstreamState {
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Answers every POST to `/api/v1/chat/completions` with a canned status and body.
pub struct FakeUpstream {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeUpstream {
    pub async fn spawn(status: StatusCode, body: &'static str) -> Self {
        Self::start(status, body, None).await
    }

    pub async fn spawn_delayed(status: StatusCode, body: &'static str, delay: Duration) -> Self {
        Self::start(status, body, Some(delay)).await
    }

    async fn start(status: StatusCode, body: &'static str, delay: Option<Duration>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = UpstreamState {
            status,
            body,
            delay,
            requests: requests.clone(),
        };
        let router = Router::new()
            .route("/api/v1/chat/completions", post(completions))
            .layer(DefaultBodyLimit::disable())
            .with_state(state);
        let addr = serve(router).await;
        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}/api/v1/chat/completions", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn completions(
    State(state): State<UpstreamState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .requests
        .lock()
        .unwrap()
        .push(CapturedRequest { headers, body });
    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }
    (state.status, state.body.to_string())
}

/// Binds a free port, serves `router` on it in the background and returns the address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A completion URL on a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v1/chat/completions", addr)
}
