use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// parley: talk to a local model service from the terminal.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service address (host:port), overriding config and OLLAMA_HOST.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive multi-turn chat.
    Chat {
        /// Model to chat with.
        #[arg(short, long)]
        model: Option<String>,

        /// System prompt for the conversation.
        #[arg(short, long)]
        system: Option<String>,

        /// Wait for each full reply instead of streaming it.
        #[arg(long)]
        no_stream: bool,
    },
    /// Generate a single completion.
    Generate {
        /// Model to use.
        #[arg(short, long)]
        model: Option<String>,

        /// Print the reply as it is generated.
        #[arg(long)]
        stream: bool,

        /// Prompt text.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// List installed models.
    List,
    /// Download a model.
    Pull { model: String },
    /// Remove an installed model.
    Delete { model: String },
    /// Create a model from an installed base model.
    Create {
        model: String,

        /// Base model to build on.
        #[arg(long)]
        from: String,

        /// System prompt baked into the new model.
        #[arg(long)]
        system: Option<String>,
    },
    /// Print the effective configuration.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}
