//! Terminal rendering of pull/create progress.

use std::io::{self, Write};

use parley_client::{Progress, ProgressStream};

use crate::error::AppError;

/// Prints one line per status; percentage updates for the same status
/// rewrite the current line.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    status: Option<String>,
    percent: Option<u32>,
}

impl ProgressPrinter {
    pub fn update(&mut self, progress: &Progress, out: &mut impl Write) -> io::Result<()> {
        let percent = progress.fraction().map(|f| (f * 100.0).floor() as u32);
        let same_status = self.status.as_deref() == Some(progress.status.as_str());
        if same_status && percent == self.percent {
            return Ok(());
        }

        if same_status {
            write!(out, "\r")?;
        } else if self.status.is_some() {
            writeln!(out)?;
        }
        match percent {
            Some(pct) => write!(out, "{} {pct:>3}%", progress.status)?,
            None => write!(out, "{}", progress.status)?,
        }
        out.flush()?;

        self.status = Some(progress.status.clone());
        self.percent = percent;
        Ok(())
    }

    /// Terminate the current line, if any.
    pub fn finish(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.status.take().is_some() {
            writeln!(out)?;
        }
        self.percent = None;
        Ok(())
    }
}

/// Drive `stream` to completion, printing every update.
pub async fn render(mut stream: ProgressStream, out: &mut impl Write) -> Result<(), AppError> {
    let mut printer = ProgressPrinter::default();
    while let Some(update) = stream.next().await {
        match update {
            Ok(progress) => printer.update(&progress, out)?,
            Err(e) => {
                printer.finish(out)?;
                return Err(e.into());
            }
        }
    }
    printer.finish(out)?;
    Ok(())
}
