//! One-shot subcommands: generate, list, pull, delete, create.

use std::io::Write;

use parley_client::{ClientError, ModelDescriptor, SessionClient};
use tracing::info;

use crate::error::AppError;
use crate::progress;
use crate::settings::TurnSettings;

/// Generate one completion for `prompt`. A missing model is pulled and the
/// request retried once when `auto_pull` is on.
pub async fn generate(
    client: &SessionClient,
    settings: &TurnSettings,
    prompt: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match generate_once(client, settings, prompt, out).await {
        Err(e) if settings.auto_pull && e.is_model_not_found() => {
            pull_missing(client, &settings.model, out).await?;
            generate_once(client, settings, prompt, out).await
        }
        other => other,
    }
}

async fn generate_once(
    client: &SessionClient,
    settings: &TurnSettings,
    prompt: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if !settings.stream {
        let reply = client
            .generate(&settings.model, prompt, settings.options())
            .await?;
        writeln!(out, "{}", reply.text)?;
        return Ok(());
    }

    let mut stream = client
        .generate_stream(&settings.model, prompt, settings.options())
        .await?;
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                write!(out, "{}", chunk.text)?;
                out.flush()?;
            }
            Err(e) => {
                if !stream.text().is_empty() {
                    writeln!(out)?;
                }
                return Err(e.into());
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

/// Pull `model` after a not-found error, showing progress.
pub async fn pull_missing(
    client: &SessionClient,
    model: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    writeln!(out, "Model '{model}' not found, pulling it...")?;
    pull(client, model, out).await
}

pub async fn pull(client: &SessionClient, model: &str, out: &mut impl Write) -> Result<(), AppError> {
    let stream = client.pull_model_stream(model).await?;
    progress::render(stream, out).await?;
    info!(model, "pull finished");
    Ok(())
}

pub async fn create(
    client: &SessionClient,
    model: &str,
    from: &str,
    system: Option<&str>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let stream = client.create_model_stream(model, from, system).await?;
    progress::render(stream, out).await
}

pub async fn delete(client: &SessionClient, model: &str, out: &mut impl Write) -> Result<(), AppError> {
    client.delete_model(model).await?;
    writeln!(out, "deleted '{model}'")?;
    Ok(())
}

pub async fn list(client: &SessionClient, out: &mut impl Write) -> Result<(), AppError> {
    let models = client.list_models().await?;
    if models.is_empty() {
        writeln!(out, "no models installed; try `parley pull <model>`")?;
        return Ok(());
    }
    write_table(&models, out)?;
    Ok(())
}

fn write_table(models: &[ModelDescriptor], out: &mut impl Write) -> std::io::Result<()> {
    let width = models
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    writeln!(out, "{:<width$}  {:>9}  {:<10}  PARAMS", "NAME", "SIZE", "FAMILY")?;
    for model in models {
        let details = model.details.clone().unwrap_or_default();
        writeln!(
            out,
            "{:<width$}  {:>9}  {:<10}  {}",
            model.name,
            human_size(model.size),
            details.family.as_deref().unwrap_or("-"),
            details.parameter_size.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

/// Decimal units, as the service itself reports sizes.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for u in UNITS {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = u;
    }
    format!("{value:.1} {unit}")
}

/// Hint printed alongside a connection failure.
pub fn hint(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Client(ClientError::ServiceUnavailable { .. }) => {
            Some("is the service running? start it with `ollama serve`")
        }
        _ => None,
    }
}
