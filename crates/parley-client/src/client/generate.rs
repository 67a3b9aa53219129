//! Generation and chat.

use tracing::debug;

use super::{effective_options, require_model, require_text, to_body, SessionClient};
use crate::chat::{ChatResponse, ChatStream};
use crate::streaming::ResponseStream;
use crate::transport::ServiceRequest;
use crate::wire::{ChatBody, GenerateBody, CHAT_PATH, GENERATE_PATH};
use crate::{ClientError, GenerationOptions, GenerationResponse, Message};

impl SessionClient {
    /// Generate a completion for `prompt` and wait for all of it.
    ///
    /// Fails with `InvalidRequest` before touching the network when the
    /// model or prompt is empty or the options are out of range.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> Result<GenerationResponse, ClientError> {
        let stream = self.start_generate(model, prompt, options, false).await?;
        stream.collect().await
    }

    /// Generate a completion for `prompt`, chunk by chunk.
    pub async fn generate_stream(
        &self,
        model: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> Result<ResponseStream, ClientError> {
        self.start_generate(model, prompt, options, true).await
    }

    /// Send `history` plus a new user turn and wait for the full reply.
    ///
    /// `history` is left untouched; the returned [`ChatResponse`] carries the
    /// updated copy.
    pub async fn chat(
        &self,
        model: &str,
        history: &[Message],
        new_message: &str,
        options: Option<&GenerationOptions>,
    ) -> Result<ChatResponse, ClientError> {
        let stream = self
            .start_chat(model, history, new_message, options, false)
            .await?;
        stream.collect().await
    }

    /// Streaming form of [`chat`](Self::chat).
    pub async fn chat_stream(
        &self,
        model: &str,
        history: &[Message],
        new_message: &str,
        options: Option<&GenerationOptions>,
    ) -> Result<ChatStream, ClientError> {
        self.start_chat(model, history, new_message, options, true)
            .await
    }

    async fn start_generate(
        &self,
        model: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
        stream: bool,
    ) -> Result<ResponseStream, ClientError> {
        require_model(model)?;
        require_text("prompt", prompt)?;
        let options = effective_options(options)?;

        let body = to_body(&GenerateBody {
            model,
            prompt,
            stream,
            options,
        })?;
        debug!(model, stream, prompt_len = prompt.len(), "generate");

        let conn = self
            .open(model, ServiceRequest::post(GENERATE_PATH, body))
            .await?;
        Ok(ResponseStream::new(conn, model))
    }

    async fn start_chat(
        &self,
        model: &str,
        history: &[Message],
        new_message: &str,
        options: Option<&GenerationOptions>,
        stream: bool,
    ) -> Result<ChatStream, ClientError> {
        require_model(model)?;
        require_text("message", new_message)?;
        let options = effective_options(options)?;

        let mut working = history.to_vec();
        working.push(Message::user(new_message));

        let body = to_body(&ChatBody {
            model,
            messages: &working,
            stream,
            options,
        })?;
        debug!(model, stream, turns = working.len(), "chat");

        let conn = self
            .open(model, ServiceRequest::post(CHAT_PATH, body))
            .await?;
        Ok(ChatStream::new(ResponseStream::new(conn, model), working))
    }
}
