//! Example tools registered by the CLI.

use std::sync::Arc;

use serde_json::{json, Number};

use crate::error::PalaverError;
use crate::tools::{FnTool, Tool, ToolSpec};

pub fn demo_tools() -> Vec<Arc<dyn Tool>> {
    vec![add_two_numbers(), get_weather()]
}

/// `add_two_numbers(a, b)`, answering `"{a} + {b} = {a+b}"`.
pub fn add_two_numbers() -> Arc<dyn Tool> {
    FnTool::sync(
        ToolSpec::builder("add_two_numbers", "Add two numbers together.")
            .number("a", "The first number")
            .number("b", "The second number")
            .build(),
        |args| {
            let a = args.get_number("a")?;
            let b = args.get_number("b")?;
            Ok(json!(format!("{a} + {b} = {}", sum(a, b)?)))
        },
    )
    .into_shared()
}

/// `get_weather(city)`. Always sunny.
pub fn get_weather() -> Arc<dyn Tool> {
    FnTool::sync(
        ToolSpec::builder("get_weather", "Get the current weather for a city.")
            .string("city", "Name of the city")
            .build(),
        |args| Ok(json!(format!("{} is sunny today", args.get_str("city")?))),
    )
    .into_shared()
}

fn sum(a: &Number, b: &Number) -> Result<Number, PalaverError> {
    if let Some(total) = a.as_i64().zip(b.as_i64()).and_then(|(x, y)| x.checked_add(y)) {
        return Ok(total.into());
    }
    let total = a.as_f64().unwrap_or_default() + b.as_f64().unwrap_or_default();
    Number::from_f64(total)
        .ok_or_else(|| PalaverError::InvalidArgument(format!("{a} + {b} is not a finite number")))
}
