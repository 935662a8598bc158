//! Name-keyed registry of tools and their exported schema.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::arguments::ToolArguments;
use super::schema::ToolSpec;
use super::tool::{tool_result_to_string, Tool};
use super::validation::{parse_arguments, validate_arguments};
use crate::error::ToolError;
use crate::types::{ToolCallRequest, ToolCallResult};

/// Registered tools in registration order, resolvable by name.
#[derive(Default, Clone)]
pub struct ToolCatalog {
    specs: Vec<ToolSpec>,
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register several tools. A name that is already present is rebound in place.
    pub fn register(&mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) {
        for tool in tools {
            self.register_tool(tool);
        }
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        let spec = tool.spec().clone();
        if spec.description.trim().is_empty() {
            tracing::warn!(tool = %spec.name, "registering tool without a description");
        }
        match self.by_name.get(&spec.name) {
            Some(&slot) => {
                tracing::debug!(tool = %spec.name, "replacing registered tool");
                self.specs[slot] = spec;
                self.tools[slot] = tool;
            }
            None => {
                self.by_name.insert(spec.name.clone(), self.specs.len());
                self.specs.push(spec);
                self.tools.push(tool);
            }
        }
    }

    /// Specs in registration order.
    pub fn export_schema(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Specs rendered as chat-request tool entries.
    pub fn render_schema(&self) -> Vec<Value> {
        self.specs.iter().map(ToolSpec::to_wire).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&slot| &self.tools[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn clear(&mut self) {
        self.specs.clear();
        self.tools.clear();
        self.by_name.clear();
    }

    /// Resolve and run a requested tool call.
    ///
    /// Lookup and argument failures are returned as errors. A failure of the
    /// tool itself is folded into the result content.
    pub async fn invoke(&self, request: &ToolCallRequest) -> Result<ToolCallResult, ToolError> {
        match self.run(request).await {
            Ok(content) => Ok(ToolCallResult::new(&request.call_id, content)),
            Err(err @ ToolError::Execution { .. }) => {
                Ok(ToolCallResult::new(&request.call_id, err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Like [`invoke`](Self::invoke), but every failure becomes result content.
    ///
    /// The flag is `true` when the content describes a failure.
    pub async fn dispatch(&self, request: &ToolCallRequest) -> (ToolCallResult, bool) {
        match self.run(request).await {
            Ok(content) => (ToolCallResult::new(&request.call_id, content), false),
            Err(err) => {
                tracing::warn!(
                    tool = %request.tool_name,
                    call_id = %request.call_id,
                    kind = err.kind(),
                    error = %err,
                    "tool call failed"
                );
                (ToolCallResult::new(&request.call_id, err.to_string()), true)
            }
        }
    }

    async fn run(&self, request: &ToolCallRequest) -> Result<String, ToolError> {
        let tool = self
            .get(&request.tool_name)
            .ok_or_else(|| ToolError::UnknownTool {
                name: request.tool_name.clone(),
            })?;
        let args = parse_arguments(&request.tool_name, &request.arguments)?;
        validate_arguments(&args, tool.spec()).map_err(|reason| ToolError::InvalidArguments {
            tool: request.tool_name.clone(),
            reason,
        })?;

        tracing::debug!(
            tool = %request.tool_name,
            call_id = %request.call_id,
            slot = request.slot_index,
            "invoking tool"
        );
        let value = tool
            .execute(&ToolArguments::new(Value::Object(args)))
            .await
            .map_err(|e| ToolError::Execution {
                tool: request.tool_name.clone(),
                message: e.to_string(),
            })?;
        Ok(tool_result_to_string(&value))
    }
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tools", &self.specs.iter().map(|s| &s.name).collect::<Vec<_>>())
            .finish()
    }
}
