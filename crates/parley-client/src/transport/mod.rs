//! The seam between the session client and the wire.
//!
//! A [`Transport`] opens one [`Connection`] per request. Replies are read
//! back line by line, which covers both single-object JSON replies and
//! newline-delimited chunk streams.

mod http;

use async_trait::async_trait;

use crate::ClientError;

pub use http::{HttpConnection, HttpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// One request to the service: method, API path and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: Option<serde_json::Value>,
}

impl ServiceRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    pub fn post(path: &'static str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(body),
        }
    }

    pub fn delete(path: &'static str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Delete,
            path,
            body: Some(body),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and hand back the open reply.
    ///
    /// Unreachable services fail with `ServiceUnavailable`; non-success
    /// replies fail with `Service` carrying the status and the service's
    /// error text.
    async fn send(&self, request: ServiceRequest) -> Result<Box<dyn Connection>, ClientError>;
}

/// An open reply body. Owned by exactly one reader.
#[async_trait]
pub trait Connection: Send {
    /// Next line of the body, without the trailing newline. `Ok(None)` at
    /// end of body.
    async fn next_line(&mut self) -> Result<Option<String>, ClientError>;

    /// Release the underlying connection. Called exactly once by the reader.
    fn close(&mut self);
}
