//! Configuration for the parley client and CLI.
//!
//! TOML-based, with defaults for every field so partial configs work out
//! of the box. The service address can be overridden from the environment
//! with `OLLAMA_HOST`, and the default model with `PARLEY_MODEL`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("talking to {}", config.service.host);
//! ```

pub mod error;
pub mod schema;
pub mod toml_loader;
pub mod validation;

use std::path::Path;

pub use error::ConfigError;
pub use schema::{DefaultsConfig, OptionsConfig, ParleyConfig, ReplConfig, ServiceConfig};

/// Environment variable naming the service address.
pub const HOST_ENV: &str = "OLLAMA_HOST";
/// Environment variable naming the default model.
pub const MODEL_ENV: &str = "PARLEY_MODEL";

/// Load, apply environment overrides, and validate.
///
/// With `path`, that file must exist. Without it, the platform default path
/// is used and created with a commented template when missing.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validation::validate(&config)?;
    Ok(config)
}

/// Apply `OLLAMA_HOST` / `PARLEY_MODEL` style overrides from `lookup`.
/// Blank values are ignored.
pub fn apply_overrides(config: &mut ParleyConfig, lookup: impl Fn(&str) -> Option<String>) {
    let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = set(HOST_ENV) {
        tracing::debug!(%host, "service host overridden from environment");
        config.service.host = host.trim().to_string();
    }
    if let Some(model) = set(MODEL_ENV) {
        tracing::debug!(%model, "default model overridden from environment");
        config.defaults.model = model.trim().to_string();
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ParleyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
