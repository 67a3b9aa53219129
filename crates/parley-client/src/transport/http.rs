//! `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;
use tracing::debug;

use super::{Connection, Method, ServiceRequest, Transport};
use crate::{ClientError, Endpoint};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks HTTP to the service. No overall request timeout is set since
/// generations and pulls can legitimately run for minutes; callers that
/// need a deadline wrap the call themselves.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &Endpoint) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::ServiceUnavailable {
                endpoint: endpoint.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url: endpoint.base_url(),
            endpoint: endpoint.to_string(),
        })
    }

    fn unavailable(&self, e: reqwest::Error) -> ClientError {
        ClientError::ServiceUnavailable {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ServiceRequest) -> Result<Box<dyn Connection>, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = ?request.method, %url, "service request");

        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Delete => self.http.delete(&url),
        };
        let builder = match request.body {
            Some(ref body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| self.unavailable(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Service {
                status: Some(status.as_u16()),
                message: error_message(&text),
            });
        }

        Ok(Box::new(HttpConnection::new(response)))
    }
}

/// Pull the service's `{"error": "..."}` text out of a failure body, or
/// fall back to the raw (truncated) body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error")?.as_str().map(String::from))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

type BodyReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Reply body exposed line by line.
pub struct HttpConnection {
    lines: Option<Lines<BodyReader>>,
}

impl HttpConnection {
    fn new(response: reqwest::Response) -> Self {
        let byte_stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader: BodyReader = Box::new(StreamReader::new(Box::pin(byte_stream)));
        Self {
            lines: Some(reader.lines()),
        }
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        lines
            .next_line()
            .await
            .map_err(|e| ClientError::StreamInterrupted(e.to_string()))
    }

    fn close(&mut self) {
        if self.lines.take().is_some() {
            debug!("closed service connection");
        }
    }
}
