//! Full configuration validation.
//!
//! Checks every section and collects all problems into a single
//! `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use helpers::{check_non_empty, check_range, check_single_word};

use crate::schema::ParleyConfig;
use crate::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    check_single_word(&mut errors, "service.host", &config.service.host);
    check_non_empty(&mut errors, "defaults.model", &config.defaults.model);

    let options = &config.options;
    if let Some(t) = options.temperature {
        check_range(&mut errors, "options.temperature", t, 0.0..=2.0);
    }
    if let Some(p) = options.top_p {
        check_range(&mut errors, "options.top_p", p, 0.0..=1.0);
    }
    if let Some(k) = options.top_k {
        check_range(&mut errors, "options.top_k", k, 1..=1000);
    }
    if let Some(ctx) = options.num_ctx {
        check_range(&mut errors, "options.num_ctx", ctx, 1..=1 << 20);
    }

    check_single_word(&mut errors, "repl.quit_keyword", &config.repl.quit_keyword);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
