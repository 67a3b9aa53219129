//! Typed failures surfaced by the session client.

/// Everything a client call can fail with.
///
/// Transport problems (`ServiceUnavailable`, `StreamInterrupted`) are kept
/// apart from problems the service reports about the request itself
/// (`ModelNotFound`, `InvalidRequest`, `Service`).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("service unavailable at {endpoint}: {reason}")]
    ServiceUnavailable { endpoint: String, reason: String },

    #[error("model '{model}' not found: {message}")]
    ModelNotFound { model: String, message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("service error{}: {message}", http_status(.status))]
    Service { status: Option<u16>, message: String },

    #[error("parse error: {0}")]
    ParseError(String),
}

fn http_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ClientError {
    /// Classify an error reported by the service while handling a request
    /// that targeted `model`.
    pub(crate) fn from_service(model: &str, status: Option<u16>, message: String) -> Self {
        if status == Some(404) || message.to_ascii_lowercase().contains("not found") {
            return Self::ModelNotFound {
                model: model.to_string(),
                message,
            };
        }
        if status == Some(400) {
            return Self::InvalidRequest(message);
        }
        Self::Service { status, message }
    }

    /// Re-classify a generic service error now that the target model is known.
    pub(crate) fn for_model(self, model: &str) -> Self {
        match self {
            Self::Service { status, message } => Self::from_service(model, status, message),
            other => other,
        }
    }

    pub fn is_model_not_found(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. })
    }
}
