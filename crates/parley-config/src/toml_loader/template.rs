//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub fn default_config_toml() -> &'static str {
    r##"# parley configuration
# Only override what you want to change -- missing fields use defaults.

[service]
# host:port of the local model service. OLLAMA_HOST overrides this.
host = "localhost:11434"

[defaults]
model = "llama2"
# system_prompt = "You are a helpful assistant."

[options]
# temperature = 0.7      # 0.0-2.0
# top_p = 0.9            # 0.0-1.0
# top_k = 40
# num_ctx = 2048         # context window in tokens
# num_predict = 256      # max tokens to generate
# seed = 42

[repl]
quit_keyword = "quit"
stream = true
# Pull a missing model and retry once.
auto_pull = true
"##
}
