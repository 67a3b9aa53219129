//! Multi-turn chat results.
//!
//! The client never keeps conversation state. A chat call takes the
//! caller's history, works on a copy with the new user turn appended, and
//! hands the copy back with the assistant's reply appended once the reply
//! is complete.

use futures_util::Stream;

use crate::streaming::ResponseStream;
use crate::{ClientError, GenerationResponse, Message, ResponseChunk};

/// A completed chat turn together with the updated history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: GenerationResponse,
    /// Input history + user turn + assistant turn.
    pub history: Vec<Message>,
}

impl ChatResponse {
    pub fn text(&self) -> &str {
        &self.reply.text
    }
}

/// Streaming chat turn.
///
/// Yields the same chunks as [`ResponseStream`]. When the terminal chunk
/// arrives the assistant's full reply is appended to the working history,
/// exactly once. A stream that is abandoned or fails leaves the history
/// ending with the user turn.
pub struct ChatStream {
    inner: ResponseStream,
    history: Vec<Message>,
    replied: bool,
}

impl ChatStream {
    pub(crate) fn new(inner: ResponseStream, history: Vec<Message>) -> Self {
        Self {
            inner,
            history,
            replied: false,
        }
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Reply text received so far.
    pub fn text(&self) -> &str {
        self.inner.text()
    }

    pub fn is_finished(&self) -> bool {
        self.replied
    }

    pub async fn next(&mut self) -> Option<Result<ResponseChunk, ClientError>> {
        let item = self.inner.next().await?;
        if let Ok(chunk) = &item {
            if chunk.done && !self.replied {
                self.history.push(Message::assistant(self.inner.text()));
                self.replied = true;
            }
        }
        Some(item)
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    /// Working history: input + user turn, plus the assistant turn once the
    /// reply completed.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Give up the stream (releasing the connection) and keep the history.
    pub fn into_history(self) -> Vec<Message> {
        self.history
    }

    /// Drain the remaining chunks into a complete chat turn.
    pub async fn collect(mut self) -> Result<ChatResponse, ClientError> {
        while let Some(chunk) = self.next().await {
            chunk?;
        }
        let completion = self.inner.completion().cloned().ok_or_else(|| {
            ClientError::StreamInterrupted("stream closed before the final chunk".into())
        })?;
        let reply = GenerationResponse {
            model: self.inner.model().to_string(),
            text: self.inner.text().to_string(),
            completion,
        };
        Ok(ChatResponse {
            reply,
            history: self.history,
        })
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<ResponseChunk, ClientError>> + Send {
        futures_util::stream::unfold(self, |mut stream| async move {
            let item = stream.next().await?;
            Some((item, stream))
        })
    }
}
