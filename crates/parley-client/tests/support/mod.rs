//! Test doubles for the session client: a scripted in-process transport and
//! a real HTTP mock server.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_client::{ClientError, Connection, Endpoint, ServiceRequest, SessionClient, Transport};
use tokio::sync::oneshot;
use warp::Filter;

/// What the mock service does with the next request.
pub enum Reply {
    /// Answer 200 with these body lines.
    Lines(Vec<String>),
    /// Send these lines, then drop the connection.
    Truncated(Vec<String>),
    /// Answer with a non-success status and an `{"error": ...}` body.
    Status(u16, String),
    /// Refuse the connection.
    Unreachable,
}

#[derive(Default)]
struct State {
    replies: VecDeque<Reply>,
    requests: Vec<ServiceRequest>,
}

/// Transport that answers from a script and records everything it sees.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
    closes: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.state.lock().unwrap().replies.push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> SessionClient {
        SessionClient::with_transport(Endpoint::default(), self.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ServiceRequest) -> Result<Box<dyn Connection>, ClientError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state.replies.pop_front()
        };
        let (lines, truncated) = match reply {
            Some(Reply::Lines(lines)) => (lines, false),
            Some(Reply::Truncated(lines)) => (lines, true),
            Some(Reply::Status(status, message)) => {
                return Err(ClientError::Service {
                    status: Some(status),
                    message,
                })
            }
            Some(Reply::Unreachable) | None => {
                return Err(ClientError::ServiceUnavailable {
                    endpoint: Endpoint::default().to_string(),
                    reason: "connection refused".into(),
                })
            }
        };
        Ok(Box::new(MockConnection {
            lines: lines.into(),
            truncated,
            closes: self.closes.clone(),
        }))
    }
}

struct MockConnection {
    lines: VecDeque<String>,
    truncated: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.truncated => Err(ClientError::StreamInterrupted(
                "connection reset by peer".into(),
            )),
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// NDJSON lines a generate call would stream for `fragments`; the last
/// line is the terminal chunk.
pub fn generate_lines(fragments: &[&str]) -> Vec<String> {
    let last = fragments.len().saturating_sub(1);
    fragments
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let mut chunk = serde_json::json!({
                "model": "llama2",
                "created_at": "2024-05-01T12:00:00Z",
                "response": text,
                "done": i == last,
            });
            if i == last {
                chunk["done_reason"] = "stop".into();
                chunk["eval_count"] = (fragments.len() as u64).into();
                chunk["eval_duration"] = 1_000_000_000u64.into();
            }
            chunk.to_string()
        })
        .collect()
}

/// NDJSON lines a chat call would stream for `fragments`.
pub fn chat_lines(fragments: &[&str]) -> Vec<String> {
    let last = fragments.len().saturating_sub(1);
    fragments
        .iter()
        .enumerate()
        .map(|(i, text)| {
            serde_json::json!({
                "model": "mistral",
                "created_at": "2024-05-01T12:00:00Z",
                "message": {"role": "assistant", "content": text},
                "done": i == last,
            })
            .to_string()
        })
        .collect()
}

/// Spawn a mock HTTP service on an ephemeral port.
///
/// `/api/generate` streams `fragments` as NDJSON (or one object when the
/// request asks for `stream: false`), `/api/tags` lists one model, and any
/// request for the model `missing` fails with 404.
pub async fn spawn_mock_server(fragments: Vec<&'static str>) -> (Endpoint, oneshot::Sender<()>) {
    let fragments = Arc::new(fragments);

    let generate = warp::path!("api" / "generate")
        .and(warp::post())
        .and(warp::body::json())
        .map(move |body: serde_json::Value| {
            if body["model"] == "missing" {
                return warp::http::Response::builder()
                    .status(404)
                    .header("content-type", "application/json")
                    .body(r#"{"error":"model 'missing' not found"}"#.to_string())
                    .unwrap();
            }
            let lines = if body["stream"] == false {
                let full: String = fragments.concat();
                generate_lines(&[full.as_str()])
            } else {
                generate_lines(&fragments)
            };
            warp::http::Response::builder()
                .status(200)
                .header("content-type", "application/x-ndjson")
                .body(lines.join("\n") + "\n")
                .unwrap()
        });

    let tags = warp::path!("api" / "tags").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "models": [{
                "name": "llama2:latest",
                "model": "llama2:latest",
                "modified_at": "2024-05-01T12:00:00Z",
                "size": 3826793677u64,
                "digest": "78e26419b4469263f75331927a00a0284ef6544c1975b826b15abdaef17bb962",
                "details": {"format": "gguf", "family": "llama", "parameter_size": "7B", "quantization_level": "Q4_0"}
            }]
        }))
    });

    let (tx, rx) = oneshot::channel::<()>();
    let (addr, server): (SocketAddr, _) = warp::serve(generate.or(tags))
        .bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async {
            rx.await.ok();
        });
    tokio::spawn(server);

    (Endpoint::new("127.0.0.1", addr.port()), tx)
}
