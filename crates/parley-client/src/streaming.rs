//! Newline-delimited JSON streaming.
//!
//! The service answers generate, chat, pull and create requests with a
//! sequence of JSON objects, one per line. The types here turn an open
//! [`Connection`] into lazy, finite, non-restartable sequences that the
//! caller drives with `next().await`. Each sequence owns its connection and
//! closes it exactly once: on the terminal item, on the first error, on
//! [`close`](ResponseStream::close), or when dropped.

use futures_util::Stream;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::transport::Connection;
use crate::wire::WireChunk;
use crate::{ClientError, Completion, GenerationResponse, Progress, ResponseChunk};

/// Scoped owner of a connection that decodes one JSON value at a time.
///
/// Values are normally one per line. A value spread over several lines (a
/// pretty-printed single-object reply) is buffered until it is complete.
pub(crate) struct LineSource {
    conn: Option<Box<dyn Connection>>,
    /// Model that service errors are attributed to, if any.
    model: Option<String>,
}

impl LineSource {
    pub(crate) fn new(conn: Box<dyn Connection>, model: impl Into<String>) -> Self {
        Self {
            conn: Some(conn),
            model: Some(model.into()),
        }
    }

    /// A source whose request did not target a model. In-body errors stay
    /// plain `Service` errors.
    pub(crate) fn unattributed(conn: Box<dyn Connection>) -> Self {
        Self {
            conn: Some(conn),
            model: None,
        }
    }

    pub(crate) fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_default()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Decode the next value, skipping blank lines. `None` at end of body or
    /// once closed. An `{"error": ...}` value is turned into a typed error.
    pub(crate) async fn next_value<T: DeserializeOwned>(
        &mut self,
    ) -> Option<Result<T, ClientError>> {
        let conn = self.conn.as_mut()?;
        let mut pending = String::new();
        loop {
            let line = match conn.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) if pending.is_empty() => return None,
                Ok(None) => {
                    return Some(Err(ClientError::StreamInterrupted(
                        "reply ended inside a JSON value".into(),
                    )))
                }
                Err(e) => return Some(Err(e)),
            };
            if pending.is_empty() && line.trim().is_empty() {
                continue;
            }
            pending.push_str(&line);
            pending.push('\n');

            match serde_json::from_str::<serde_json::Value>(&pending) {
                Ok(value) => return Some(decode(self.model.as_deref(), value, &pending)),
                Err(e) if e.is_eof() => continue,
                Err(e) => {
                    return Some(Err(ClientError::ParseError(format!(
                        "{e}: {}",
                        pending.trim()
                    ))))
                }
            }
        }
    }

    pub(crate) fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            debug!(model = self.model(), "releasing stream connection");
            conn.close();
        }
    }
}

fn decode<T: DeserializeOwned>(
    model: Option<&str>,
    value: serde_json::Value,
    raw: &str,
) -> Result<T, ClientError> {
    if let Some(error) = value.get("error") {
        let message = error
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(match model {
            Some(model) => ClientError::from_service(model, None, message),
            None => ClientError::Service {
                status: None,
                message,
            },
        });
    }
    serde_json::from_value(value)
        .map_err(|e| ClientError::ParseError(format!("{e}: {}", raw.trim())))
}

impl Drop for LineSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Lazy sequence of generate or chat chunks.
///
/// Fragments are concatenated in arrival order; the reassembled text so far
/// is available through [`text`](Self::text).
pub struct ResponseStream {
    source: LineSource,
    text: String,
    completion: Option<Completion>,
}

impl ResponseStream {
    pub(crate) fn new(conn: Box<dyn Connection>, model: impl Into<String>) -> Self {
        Self {
            source: LineSource::new(conn, model),
            text: String::new(),
            completion: None,
        }
    }

    pub fn model(&self) -> &str {
        self.source.model()
    }

    /// Text received so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the terminal chunk has been received.
    pub fn is_finished(&self) -> bool {
        self.completion.is_some()
    }

    /// Completion metadata, once the terminal chunk has arrived.
    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    /// Next chunk, or `None` once the stream is finished, failed or closed.
    pub async fn next(&mut self) -> Option<Result<ResponseChunk, ClientError>> {
        if !self.source.is_open() {
            return None;
        }
        let chunk = match self.source.next_value::<WireChunk>().await {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => {
                self.source.close();
                return Some(Err(e));
            }
            None => {
                self.source.close();
                return Some(Err(ClientError::StreamInterrupted(
                    "connection closed before the final chunk".into(),
                )));
            }
        };

        let (text, done, completion) = chunk.into_text();
        self.text.push_str(&text);

        if done {
            self.completion = Some(completion.clone());
            self.source.close();
            return Some(Ok(ResponseChunk {
                text,
                done,
                completion: Some(completion),
            }));
        }

        Some(Ok(ResponseChunk {
            text,
            done,
            completion: None,
        }))
    }

    /// Stop early and release the connection. Further `next` calls yield `None`.
    pub fn close(&mut self) {
        self.source.close();
    }

    /// Drain the remaining chunks into a complete response.
    pub async fn collect(mut self) -> Result<GenerationResponse, ClientError> {
        while let Some(chunk) = self.next().await {
            chunk?;
        }
        let completion = self.completion.take().ok_or_else(|| {
            ClientError::StreamInterrupted("stream closed before the final chunk".into())
        })?;
        Ok(GenerationResponse {
            model: self.source.model().to_string(),
            text: std::mem::take(&mut self.text),
            completion,
        })
    }

    /// Adapt into a `futures` [`Stream`]. Dropping the stream releases the
    /// connection.
    pub fn into_stream(self) -> impl Stream<Item = Result<ResponseChunk, ClientError>> + Send {
        futures_util::stream::unfold(self, |mut stream| async move {
            let item = stream.next().await?;
            Some((item, stream))
        })
    }
}

/// Lazy sequence of progress updates from a pull or create.
pub struct ProgressStream {
    source: LineSource,
    last: Option<Progress>,
}

impl ProgressStream {
    pub(crate) fn new(conn: Box<dyn Connection>, model: impl Into<String>) -> Self {
        Self {
            source: LineSource::new(conn, model),
            last: None,
        }
    }

    pub fn model(&self) -> &str {
        self.source.model()
    }

    pub fn is_finished(&self) -> bool {
        self.last.as_ref().is_some_and(Progress::is_success)
    }

    pub async fn next(&mut self) -> Option<Result<Progress, ClientError>> {
        if !self.source.is_open() {
            return None;
        }
        let progress = match self.source.next_value::<Progress>().await {
            Some(Ok(progress)) => progress,
            Some(Err(e)) => {
                self.source.close();
                return Some(Err(e));
            }
            None => {
                self.source.close();
                return Some(Err(ClientError::StreamInterrupted(
                    "connection closed before the operation reported success".into(),
                )));
            }
        };

        if progress.is_success() {
            self.source.close();
        }
        self.last = Some(progress.clone());
        Some(Ok(progress))
    }

    pub fn close(&mut self) {
        self.source.close();
    }

    /// Drain the remaining updates, returning the final one.
    pub async fn finish(mut self) -> Result<Progress, ClientError> {
        while let Some(progress) = self.next().await {
            progress?;
        }
        self.last
            .take()
            .filter(Progress::is_success)
            .ok_or_else(|| ClientError::StreamInterrupted("operation did not complete".into()))
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Progress, ClientError>> + Send {
        futures_util::stream::unfold(self, |mut stream| async move {
            let item = stream.next().await?;
            Some((item, stream))
        })
    }
}
