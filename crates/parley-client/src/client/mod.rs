//! The session client: a typed façade over the service's request/response
//! cycle.

mod generate;
mod models;

use serde::Serialize;
use tracing::debug;

use crate::transport::{Connection, HttpTransport, ServiceRequest, Transport};
use crate::{ClientError, Endpoint, GenerationOptions};

/// Client for one service endpoint.
///
/// Holds no conversation or request state: every call is a single
/// request/response exchange over its own connection, so one client can be
/// shared by reference and separate clients can run on separate tasks.
pub struct SessionClient {
    endpoint: Endpoint,
    transport: Box<dyn Transport>,
}

impl SessionClient {
    /// Client talking HTTP to `endpoint`.
    pub fn new(endpoint: Endpoint) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&endpoint)?;
        Ok(Self::with_transport(endpoint, transport))
    }

    /// Client using a caller-supplied transport.
    pub fn with_transport(endpoint: Endpoint, transport: impl Transport + 'static) -> Self {
        Self {
            endpoint,
            transport: Box::new(transport),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send one request; service errors are attributed to `model`.
    pub(crate) async fn open(
        &self,
        model: &str,
        request: ServiceRequest,
    ) -> Result<Box<dyn Connection>, ClientError> {
        debug!(endpoint = %self.endpoint, path = request.path, model, "opening request");
        self.transport
            .send(request)
            .await
            .map_err(|e| e.for_model(model))
    }
}

pub(crate) fn to_body(body: &impl Serialize) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::InvalidRequest(e.to_string()))
}

pub(crate) fn require_model(model: &str) -> Result<(), ClientError> {
    if model.trim().is_empty() {
        return Err(ClientError::InvalidRequest("model name must not be empty".into()));
    }
    Ok(())
}

pub(crate) fn require_text(what: &str, text: &str) -> Result<(), ClientError> {
    if text.trim().is_empty() {
        return Err(ClientError::InvalidRequest(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Validate options and drop them entirely when nothing is set.
pub(crate) fn effective_options(
    options: Option<&GenerationOptions>,
) -> Result<Option<&GenerationOptions>, ClientError> {
    match options {
        Some(opts) => {
            opts.validate()?;
            Ok((!opts.is_empty()).then_some(opts))
        }
        None => Ok(None),
    }
}
