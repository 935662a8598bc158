//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::arguments::ToolArguments;
use super::schema::ToolSpec;
use crate::error::PalaverError;

/// Core tool trait. Implement to expose a local function to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declared signature; its name is the catalog key.
    fn spec(&self) -> &ToolSpec;

    fn name(&self) -> &str {
        &self.spec().name
    }

    /// Run the tool. Arguments have already been checked against [`Tool::spec`].
    async fn execute(&self, args: &ToolArguments) -> Result<Value, PalaverError>;
}

type ToolHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<Value, PalaverError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick tool creation.
pub struct FnTool {
    spec: ToolSpec,
    handler: Arc<ToolHandler>,
}

impl FnTool {
    /// Create a tool from an async closure.
    pub fn new<F, Fut>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, PalaverError>> + Send + 'static,
    {
        Self {
            spec,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// Create a tool from a synchronous closure.
    pub fn sync<F>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(&ToolArguments) -> Result<Value, PalaverError> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        Self::new(spec, move |args| {
            let handler = Arc::clone(&handler);
            async move { handler(&args) }
        })
    }

    /// Wrap into the shared form a catalog stores.
    pub fn into_shared(self) -> Arc<dyn Tool> {
        Arc::new(self)
    }
}

#[async_trait]
impl Tool for FnTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, args: &ToolArguments) -> Result<Value, PalaverError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.spec.name)
            .field("description", &self.spec.description)
            .finish()
    }
}

/// Content sent back to the model for a tool's return value.
pub(crate) fn tool_result_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
