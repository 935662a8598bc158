//! Tool system for function calling.

pub mod arguments;
pub mod catalog;
pub mod schema;
pub mod tool;
pub mod validation;

pub use arguments::ToolArguments;
pub use catalog::ToolCatalog;
pub use schema::{ParamKind, ParamSpec, ToolSpec, ToolSpecBuilder};
pub use tool::{FnTool, Tool};
