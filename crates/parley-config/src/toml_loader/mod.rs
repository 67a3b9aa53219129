//! TOML config file handling.

mod files;
mod template;


pub use files::{create_default_config, default_config_path, load_default, load_from_path};
pub use template::default_config_toml;
