//! Turning the loaded config and command-line flags into client inputs.

use parley_client::{ClientError, Endpoint, GenerationOptions};
use parley_config::{OptionsConfig, ParleyConfig};

/// Everything a chat or generate command needs beyond the client itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSettings {
    pub model: String,
    pub system_prompt: Option<String>,
    pub options: Option<GenerationOptions>,
    pub quit_keyword: String,
    pub stream: bool,
    pub auto_pull: bool,
}

impl TurnSettings {
    /// Config values, with `model` and `system` taking precedence when given.
    pub fn from_config(config: &ParleyConfig, model: Option<&str>, system: Option<&str>) -> Self {
        Self {
            model: model
                .map(str::to_string)
                .unwrap_or_else(|| config.defaults.model.clone()),
            system_prompt: system
                .map(str::to_string)
                .or_else(|| config.defaults.system_prompt.clone()),
            options: generation_options(&config.options),
            quit_keyword: config.repl.quit_keyword.clone(),
            stream: config.repl.stream,
            auto_pull: config.repl.auto_pull,
        }
    }

    pub fn options(&self) -> Option<&GenerationOptions> {
        self.options.as_ref()
    }
}

/// Map the `[options]` table onto request options. `None` when nothing is set.
pub fn generation_options(config: &OptionsConfig) -> Option<GenerationOptions> {
    let mut options = GenerationOptions::new();
    if let Some(t) = config.temperature {
        options = options.with_temperature(t as f32);
    }
    if let Some(p) = config.top_p {
        options = options.with_top_p(p as f32);
    }
    if let Some(k) = config.top_k {
        options = options.with_top_k(k);
    }
    if let Some(n) = config.num_ctx {
        options = options.with_num_ctx(n);
    }
    if let Some(n) = config.num_predict {
        options = options.with_num_predict(n);
    }
    if let Some(seed) = config.seed {
        options = options.with_seed(seed);
    }
    (!options.is_empty()).then_some(options)
}

/// `--host` wins over the config (which already reflects `OLLAMA_HOST`).
pub fn resolve_endpoint(flag: Option<&str>, config: &ParleyConfig) -> Result<Endpoint, ClientError> {
    flag.unwrap_or(&config.service.host).parse()
}
