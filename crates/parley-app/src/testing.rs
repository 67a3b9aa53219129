//! Scripted transport for exercising commands without a service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_client::{ClientError, Connection, Endpoint, ServiceRequest, SessionClient, Transport};

enum Step {
    Lines(Vec<String>),
    NotFound,
}

#[derive(Clone, Default)]
pub struct Script {
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<ServiceRequest>>>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(self, lines: Vec<String>) -> Self {
        self.steps.lock().unwrap().push_back(Step::Lines(lines));
        self
    }

    /// Answer 404, as the service does for an unknown model.
    pub fn not_found(self) -> Self {
        self.steps.lock().unwrap().push_back(Step::NotFound);
        self
    }

    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> SessionClient {
        SessionClient::with_transport(Endpoint::default(), self.clone())
    }
}

#[async_trait]
impl Transport for Script {
    async fn send(&self, request: ServiceRequest) -> Result<Box<dyn Connection>, ClientError> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Lines(lines)) => Ok(Box::new(Lines(lines.into()))),
            Some(Step::NotFound) | None => Err(ClientError::Service {
                status: Some(404),
                message: "model not found, try pulling it first".into(),
            }),
        }
    }
}

struct Lines(VecDeque<String>);

#[async_trait]
impl Connection for Lines {
    async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        Ok(self.0.pop_front())
    }

    fn close(&mut self) {}
}

/// NDJSON generate reply made of `fragments`.
pub fn gen_lines(fragments: &[&str]) -> Vec<String> {
    let mut lines: Vec<String> = fragments
        .iter()
        .map(|f| serde_json::json!({"response": f, "done": false}).to_string())
        .collect();
    lines.push(r#"{"response":"","done":true,"done_reason":"stop"}"#.into());
    lines
}

/// NDJSON chat reply made of `fragments`.
pub fn chat_lines(fragments: &[&str]) -> Vec<String> {
    let mut lines: Vec<String> = fragments
        .iter()
        .map(|f| {
            serde_json::json!({"message": {"role": "assistant", "content": f}, "done": false})
                .to_string()
        })
        .collect();
    lines.push(
        r#"{"message":{"role":"assistant","content":""},"done":true,"done_reason":"stop"}"#.into(),
    );
    lines
}
