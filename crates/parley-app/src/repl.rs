//! Interactive chat loop.
//!
//! Reads one user turn per line. The conversation history lives here, not
//! in the client: each successful turn replaces it with the updated copy
//! the client hands back, and a failed turn leaves it as it was.

use std::io::Write;

use parley_client::{Message, SessionClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::commands;
use crate::error::AppError;
use crate::settings::TurnSettings;

/// Always ends the session, alongside the configured quit keyword.
const EXIT_KEYWORD: &str = "exit";

pub struct Repl<'a, W: Write> {
    client: &'a SessionClient,
    settings: TurnSettings,
    history: Vec<Message>,
    out: W,
}

impl<'a, W: Write> Repl<'a, W> {
    pub fn new(client: &'a SessionClient, settings: TurnSettings, out: W) -> Self {
        let history = settings
            .system_prompt
            .iter()
            .map(Message::system)
            .collect();
        Self {
            client,
            settings,
            history,
            out,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    fn is_quit(&self, line: &str) -> bool {
        line.eq_ignore_ascii_case(&self.settings.quit_keyword)
            || line.eq_ignore_ascii_case(EXIT_KEYWORD)
    }

    /// Run until the quit keyword or end of input. Returns the number of
    /// completed turns.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<usize, AppError> {
        writeln!(
            self.out,
            "Chatting with {}. Type '{}' to exit.",
            self.settings.model, self.settings.quit_keyword
        )?;

        let mut lines = input.lines();
        let mut turns = 0;
        loop {
            write!(self.out, "You: ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.is_quit(line) {
                break;
            }

            match self.turn(line).await {
                Ok(()) => turns += 1,
                Err(e) => {
                    warn!(error = %e, "chat turn failed");
                    writeln!(self.out, "error: {e}")?;
                    if let Some(hint) = commands::hint(&e) {
                        writeln!(self.out, "hint: {hint}")?;
                    }
                }
            }
        }

        debug!(turns, messages = self.history.len(), "chat session ended");
        Ok(turns)
    }

    async fn turn(&mut self, line: &str) -> Result<(), AppError> {
        match self.send(line).await {
            Err(e) if self.settings.auto_pull && e.is_model_not_found() => {
                let model = self.settings.model.clone();
                commands::pull_missing(self.client, &model, &mut self.out).await?;
                self.send(line).await
            }
            other => other,
        }
    }

    async fn send(&mut self, line: &str) -> Result<(), AppError> {
        let client = self.client;
        let model = self.settings.model.as_str();
        let options = self.settings.options.as_ref();

        if !self.settings.stream {
            let reply = client.chat(model, &self.history, line, options).await?;
            writeln!(self.out, "Assistant: {}", reply.text())?;
            self.history = reply.history;
            return Ok(());
        }

        let mut stream = client.chat_stream(model, &self.history, line, options).await?;
        let mut started = false;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    if started {
                        writeln!(self.out)?;
                    }
                    return Err(e.into());
                }
            };
            if !started {
                write!(self.out, "Assistant: ")?;
                started = true;
            }
            write!(self.out, "{}", chunk.text)?;
            self.out.flush()?;
        }
        writeln!(self.out)?;
        self.history = stream.into_history();
        Ok(())
    }
}
