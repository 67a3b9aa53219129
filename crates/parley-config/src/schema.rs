//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub service: ServiceConfig,
    pub defaults: DefaultsConfig,
    pub options: OptionsConfig,
    pub repl: ReplConfig,
}

/// Where the local service listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// `host:port`, optionally with an `http://` prefix.
    pub host: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "localhost:11434".into(),
        }
    }
}

/// Defaults applied when the command line does not say otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub model: String,
    /// System prompt placed at the head of every new chat.
    pub system_prompt: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "llama2".into(),
            system_prompt: None,
        }
    }
}

/// Generation options sent with every request. Unset values are left to
/// the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: Option<f64>,
    /// Nucleus sampling cutoff (valid range: 0.0-1.0).
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    /// Context window in tokens.
    pub num_ctx: Option<u32>,
    pub num_predict: Option<i32>,
    pub seed: Option<i64>,
}

/// Interactive chat loop behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Typing this (case-insensitive) ends the session. `exit` always works too.
    pub quit_keyword: String,
    /// Print replies as they are generated.
    pub stream: bool,
    /// Pull a missing model and retry once instead of failing.
    pub auto_pull: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            quit_keyword: "quit".into(),
            stream: true,
            auto_pull: true,
        }
    }
}
