//! Agent system: one user turn with at most one tool round.

pub mod events;
pub mod orchestrator;

pub use events::{AgentEvent, EventSink, TurnId};
pub use orchestrator::{Agent, TurnOutcome, TurnState, UserInput};
