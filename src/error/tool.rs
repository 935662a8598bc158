//! Failures of a single tool invocation.
//!
//! None of these abort a turn: the orchestrator renders them into the tool's
//! result content so the model can react.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// No tool with this name is registered.
    #[error("UnknownTool: no tool named '{name}' is registered")]
    UnknownTool { name: String },

    /// The accumulated argument text is not a JSON object.
    #[error("MalformedArguments: arguments for '{tool}' are not a valid JSON object: {reason}")]
    MalformedArguments { tool: String, reason: String },

    /// The arguments parsed but do not satisfy the tool's declared parameters.
    #[error("InvalidArguments: arguments for '{tool}' do not match its schema: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The tool itself returned an error.
    #[error("ToolExecutionError: '{tool}' failed: {message}")]
    Execution { tool: String, message: String },
}

impl ToolError {
    /// Taxonomy name, as it prefixes the rendered message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "UnknownTool",
            Self::MalformedArguments { .. } => "MalformedArguments",
            Self::InvalidArguments { .. } => "InvalidArguments",
            Self::Execution { .. } => "ToolExecutionError",
        }
    }

    /// Name of the tool the failure refers to.
    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool { name } => name,
            Self::MalformedArguments { tool, .. }
            | Self::InvalidArguments { tool, .. }
            | Self::Execution { tool, .. } => tool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_starts_with_kind() {
        let errors = [
            ToolError::UnknownTool { name: "x".into() },
            ToolError::MalformedArguments {
                tool: "x".into(),
                reason: "eof".into(),
            },
            ToolError::InvalidArguments {
                tool: "x".into(),
                reason: "missing 'a'".into(),
            },
            ToolError::Execution {
                tool: "x".into(),
                message: "boom".into(),
            },
        ];
        for err in errors {
            assert!(err.to_string().starts_with(&format!("{}: ", err.kind())));
            assert_eq!(err.tool_name(), "x");
        }
    }
}
