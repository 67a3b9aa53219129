//! parley: terminal front end for a local model service.
//!
//! `parley chat` runs an interactive conversation; the other subcommands
//! are one-shot: generate a completion, or list, pull, create and delete
//! models.

mod cli;
mod commands;
mod error;
mod progress;
mod repl;
mod settings;
#[cfg(test)]
mod testing;

use std::io::Write;
use std::process::ExitCode;

use parley_client::SessionClient;
use tokio::io::BufReader;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};
use crate::error::AppError;
use crate::repl::Repl;
use crate::settings::{resolve_endpoint, TurnSettings};

const DEFAULT_LOG_DIRECTIVE: &str = "parley=warn";

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let (directive, warning) = log_directive(args.log_level.as_deref());
    if let Some(warning) = warning {
        eprintln!("warning: {warning}");
    }

    // Logs go to stderr so they never interleave with replies on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = commands::hint(&e) {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Filter directive for `--log-level`. An unparsable value falls back to
/// the default and comes back with a message for the user.
fn log_directive(level: Option<&str>) -> (Directive, Option<String>) {
    let default = || {
        DEFAULT_LOG_DIRECTIVE
            .parse()
            .unwrap_or_else(|_| LevelFilter::WARN.into())
    };
    match level {
        None => (default(), None),
        Some(level) => match level.parse() {
            Ok(directive) => (directive, None),
            Err(e) => (
                default(),
                Some(format!(
                    "ignoring --log-level {level:?} ({e}); using {DEFAULT_LOG_DIRECTIVE}"
                )),
            ),
        },
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = parley_config::load_config(args.config.as_deref())?;

    if let Command::Config = args.command {
        let path = match args.config {
            Some(path) => Some(path),
            None => parley_config::toml_loader::default_config_path().ok(),
        };
        if let Some(path) = path {
            println!("# {}", path.display());
        }
        println!("{}", parley_config::config_to_json(&config));
        return Ok(());
    }

    let endpoint = resolve_endpoint(args.host.as_deref(), &config)?;
    tracing::info!(%endpoint, "parley v{}", env!("CARGO_PKG_VERSION"));
    let client = SessionClient::new(endpoint)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Chat {
            model,
            system,
            no_stream,
        } => {
            let mut settings = TurnSettings::from_config(&config, model.as_deref(), system.as_deref());
            settings.stream &= !no_stream;
            let mut repl = Repl::new(&client, settings, &mut out);
            repl.run(BufReader::new(tokio::io::stdin())).await?;
        }
        Command::Generate {
            model,
            stream,
            prompt,
        } => {
            let mut settings = TurnSettings::from_config(&config, model.as_deref(), None);
            settings.stream = stream;
            commands::generate(&client, &settings, &prompt.join(" "), &mut out).await?;
        }
        Command::List => commands::list(&client, &mut out).await?,
        Command::Pull { model } => commands::pull(&client, &model, &mut out).await?,
        Command::Delete { model } => commands::delete(&client, &model, &mut out).await?,
        Command::Create {
            model,
            from,
            system,
        } => commands::create(&client, &model, &from, system.as_deref(), &mut out).await?,
        Command::Config => {}
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(directive: &str) -> Directive {
        directive.parse().unwrap()
    }

    #[test]
    fn log_level_defaults_quietly() {
        let (directive, warning) = log_directive(None);
        assert_eq!(directive, parsed(DEFAULT_LOG_DIRECTIVE));
        assert!(warning.is_none());
    }

    #[test]
    fn valid_log_level_is_used() {
        let (directive, warning) = log_directive(Some("parley=debug"));
        assert_eq!(directive, parsed("parley=debug"));
        assert!(warning.is_none());
    }

    #[test]
    fn invalid_log_level_falls_back_with_warning() {
        let (directive, warning) = log_directive(Some("parley=loud"));
        assert_eq!(directive, parsed(DEFAULT_LOG_DIRECTIVE));
        assert!(warning.unwrap().contains("parley=loud"));
    }
}
