//! CLI argument types and demo tools for the `palaver` binary.

pub mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// palaver CLI
#[derive(Parser, Debug)]
#[command(name = "palaver", version, about = "Chat with a tool-calling model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the model; reads prompts from stdin when none is given
    Chat(ChatArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Model id (overrides config and PALAVER_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Developer prompt added before the first turn
    #[arg(short, long)]
    pub system: Option<String>,

    /// Image file to attach to the first turn (repeatable)
    #[arg(short, long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,

    /// Config file (default: ~/.palaver/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print the rendered transcript as JSON when done
    #[arg(long)]
    pub show_history: bool,

    /// User prompt (positional)
    pub prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_flags() {
        let cli = Cli::parse_from([
            "palaver", "chat", "--image", "a.png", "--image", "b.jpg", "-m", "gpt-4o", "hello",
        ]);
        let Commands::Chat(args) = cli.command;
        assert_eq!(args.images.len(), 2);
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
        assert_eq!(args.prompt.as_deref(), Some("hello"));
        assert!(!args.show_history);
    }
}
