//! Session client for a local generative-text service.
//!
//! Talks to an Ollama-compatible server (default `localhost:11434`) and
//! provides:
//! - Blocking generation
//! - Streaming generation as a lazy, pull-based sequence of chunks
//! - Multi-turn chat where the caller owns the conversation history
//! - Pass-through model management (list, pull, create, delete)

pub mod chat;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod options;
pub mod response;
pub mod streaming;
pub mod transport;

mod wire;

pub use chat::{ChatResponse, ChatStream};
pub use client::SessionClient;
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use options::GenerationOptions;
pub use response::{
    Completion, GenerationResponse, ModelDescriptor, ModelDetails, Progress, ResponseChunk,
};
pub use streaming::{ProgressStream, ResponseStream};
pub use transport::{Connection, HttpTransport, Method, ServiceRequest, Transport};

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Token counts reported by the service for one exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
