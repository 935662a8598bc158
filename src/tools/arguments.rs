//! Typed access to tool call arguments.

use serde_json::Value;

use crate::error::PalaverError;

/// Parsed arguments of one tool call, with typed getters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    pub fn into_inner(self) -> Value {
        self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, PalaverError> {
        self.value
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| PalaverError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(Value::as_str)
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, PalaverError> {
        self.value
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| PalaverError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a float argument. Integers are widened.
    pub fn get_f64(&self, key: &str) -> Result<f64, PalaverError> {
        self.value
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| PalaverError::InvalidArgument(format!("Missing number argument: {key}")))
    }

    /// Get a raw JSON number, keeping its integer/float form.
    pub fn get_number(&self, key: &str) -> Result<&serde_json::Number, PalaverError> {
        match self.value.get(key) {
            Some(Value::Number(n)) => Ok(n),
            _ => Err(PalaverError::InvalidArgument(format!(
                "Missing number argument: {key}"
            ))),
        }
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, PalaverError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            PalaverError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
