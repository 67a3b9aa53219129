//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = ParleyConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_empty_model() {
    let mut config = ParleyConfig::default();
    config.defaults.model = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("defaults.model"));
}

#[test]
fn catches_host_with_spaces() {
    let mut config = ParleyConfig::default();
    config.service.host = "local host:11434".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("service.host"));
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = ParleyConfig::default();
    config.options.temperature = Some(3.5);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("options.temperature"));
}

#[test]
fn catches_nan_top_p() {
    let mut config = ParleyConfig::default();
    config.options.top_p = Some(f64::NAN);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("options.top_p"));
}

#[test]
fn catches_zero_context_window() {
    let mut config = ParleyConfig::default();
    config.options.num_ctx = Some(0);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("options.num_ctx"));
}

#[test]
fn catches_empty_quit_keyword() {
    let mut config = ParleyConfig::default();
    config.repl.quit_keyword = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("repl.quit_keyword"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = ParleyConfig::default();
    config.options.top_k = Some(0);
    config.options.top_p = Some(-0.1);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("options.top_k"));
    assert!(err.contains("options.top_p"));
    assert!(err.contains("; "));
}

#[test]
fn boundary_values_are_valid() {
    let mut config = ParleyConfig::default();
    config.options.temperature = Some(0.0);
    config.options.top_p = Some(1.0);
    config.options.top_k = Some(1);
    config.options.num_ctx = Some(1 << 20);
    assert!(validate(&config).is_ok());
}
