//! palaver CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use palaver::agent::{Agent, AgentEvent, UserInput};
use palaver::cli::{demo::demo_tools, ChatArgs, Cli, Commands};
use palaver::config::AgentConfig;
use palaver::types::ImageRef;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("palaver=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Chat(chat_args) => handle_chat(chat_args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_chat(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AgentConfig::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if args.temperature.is_some() {
        config.settings.temperature = args.temperature;
    }
    if args.max_tokens.is_some() {
        config.settings.max_tokens = args.max_tokens;
    }

    let mut images = args
        .images
        .iter()
        .map(ImageRef::from_path)
        .collect::<Result<Vec<_>, _>>()?;

    let mut agent = Agent::from_config(&config)?
        .with_tools(demo_tools())
        .with_event_sink(Arc::new(print_event));
    if let Some(system) = args.system {
        agent = agent.with_system_prompt(system);
    }

    match args.prompt {
        Some(prompt) => {
            let input = UserInput::text(prompt).with_images(std::mem::take(&mut images));
            agent.run_turn(input).await?;
        }
        None => {
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let input = UserInput::text(line).with_images(std::mem::take(&mut images));
                agent.run_turn(input).await?;
            }
        }
    }

    if args.show_history {
        println!("{}", serde_json::to_string_pretty(&agent.memory().render())?);
    }

    Ok(())
}

fn print_event(event: AgentEvent) {
    match event {
        AgentEvent::TextDelta { text, .. } => {
            print!("{text}");
            let _ = std::io::stdout().flush();
        }
        AgentEvent::ToolCallRequested { request, .. } => {
            eprintln!("[tool] {}({})", request.tool_name, request.arguments);
        }
        AgentEvent::ToolResult {
            result, is_error, ..
        } => {
            let label = if is_error { "tool error" } else { "tool result" };
            eprintln!("[{label}] {}", result.content);
        }
        AgentEvent::TurnCompleted { .. } => println!(),
        AgentEvent::TurnStarted { .. } | AgentEvent::TurnFailed { .. } => {}
    }
}
