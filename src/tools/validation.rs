//! Parse and validate tool call arguments before execution.

use serde_json::{Map, Value};

use super::schema::{ParamKind, ToolSpec};
use crate::error::ToolError;

/// Parse streamed argument text into a JSON object.
///
/// Whitespace-only text is treated as an empty object.
pub fn parse_arguments(tool: &str, text: &str) -> Result<Map<String, Value>, ToolError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }
    let malformed = |reason: String| ToolError::MalformedArguments {
        tool: tool.to_string(),
        reason,
    };
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(format!(
            "expected object arguments, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

/// Check parsed arguments against a tool's declared parameters.
///
/// Returns a description of the first violation found.
pub fn validate_arguments(args: &Map<String, Value>, spec: &ToolSpec) -> Result<(), String> {
    for param in &spec.params {
        let Some(value) = args.get(&param.name) else {
            return Err(format!("missing required field '{}'", param.name));
        };
        let matches = match param.kind {
            ParamKind::Number => value.is_number(),
            ParamKind::String => value.is_string(),
        };
        if !matches {
            return Err(format!(
                "field '{}' expected type '{}', got {}",
                param.name,
                param.kind,
                json_type_name(value)
            ));
        }
        if let (Some(allowed), Some(s)) = (&param.allowed, value.as_str()) {
            if !allowed.iter().any(|a| a == s) {
                return Err(format!(
                    "field '{}' must be one of [{}], got '{s}'",
                    param.name,
                    allowed.join(", ")
                ));
            }
        }
    }

    if let Some(extra) = args.keys().find(|k| spec.param(k).is_none()) {
        return Err(format!("unexpected field '{extra}'"));
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
