//! palaver: a small conversational agent runtime.
//!
//! An [`Agent`](agent::Agent) keeps a rolling transcript, exposes registered
//! tools to a streaming chat model, reassembles the tool calls the model
//! streams back, runs them, and asks the model once more for the final answer.
//!
//! # Quick Start
//!
//! ```no_run
//! use palaver::prelude::*;
//! use serde_json::json;
//!
//! # async fn example() -> palaver::error::Result<()> {
//! let config = AgentConfig::load(None)?;
//! let add = FnTool::sync(
//!     ToolSpec::builder("add", "Add two numbers")
//!         .number("a", "first addend")
//!         .number("b", "second addend")
//!         .build(),
//!     |args| Ok(json!(args.get_f64("a")? + args.get_f64("b")?)),
//! );
//! let mut agent = Agent::from_config(&config)?.with_tools([add.into_shared()]);
//! let answer = agent.chat("What is 2 + 2?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod memory;
pub mod prelude;
pub mod provider;
pub mod stream;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
