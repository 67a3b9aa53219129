//! Request bodies and reply shapes of the service's REST API.

use serde::{Deserialize, Serialize};

use crate::{Completion, GenerationOptions, Message, ModelDescriptor};

pub(crate) const GENERATE_PATH: &str = "/api/generate";
pub(crate) const CHAT_PATH: &str = "/api/chat";
pub(crate) const TAGS_PATH: &str = "/api/tags";
pub(crate) const PULL_PATH: &str = "/api/pull";
pub(crate) const CREATE_PATH: &str = "/api/create";
pub(crate) const DELETE_PATH: &str = "/api/delete";

#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'a GenerationOptions>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'a GenerationOptions>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PullBody<'a> {
    pub model: &'a str,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a> {
    pub model: &'a str,
    pub from: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteBody<'a> {
    pub model: &'a str,
}

/// One line of a generate or chat reply. Generate replies carry text in
/// `response`, chat replies in `message.content`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireChunk {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub done: bool,
    #[serde(flatten)]
    pub completion: Completion,
}

impl WireChunk {
    pub fn into_text(self) -> (String, bool, Completion) {
        let text = self
            .response
            .or_else(|| self.message.map(|m| m.content))
            .unwrap_or_default();
        (text, self.done, self.completion)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsReply {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}
