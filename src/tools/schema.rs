//! Declared tool signatures and their strict JSON-schema rendering.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum::{Display, EnumString};

/// Primitive kind of a tool parameter as exposed to the model.
///
/// Integers and floats are both `Number`; anything else is a `String`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamKind {
    Number,
    #[default]
    String,
}

/// One named parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Closed set of allowed string literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl ParamSpec {
    pub fn number(name: impl Into<String>) -> Self {
        Self::of_kind(name, ParamKind::Number)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::of_kind(name, ParamKind::String)
    }

    /// A string parameter restricted to `values`.
    pub fn string_enum<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self {
            allowed: Some(values.iter().map(|v| v.as_ref().to_string()).collect()),
            ..Self::string(name)
        }
    }

    fn of_kind(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            allowed: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_property(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), Value::String(self.kind.to_string()));
        if let Some(description) = &self.description {
            property.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(allowed) = &self.allowed {
            property.insert("enum".into(), json!(allowed));
        }
        Value::Object(property)
    }
}

/// Name, description and ordered parameters of a tool.
///
/// Every parameter is required in the exposed schema, whatever the tool
/// itself treats as optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    /// Start building a spec.
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            spec: ToolSpec {
                name: name.into(),
                description: description.into(),
                params: Vec::new(),
            },
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// The `parameters` object of the function schema.
    pub fn parameters_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.clone(), p.to_property()))
            .collect();
        let required: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Full function-tool entry for a chat request.
    pub fn to_wire(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "strict": true,
                "parameters": self.parameters_schema(),
            }
        })
    }
}

/// Builder for [`ToolSpec`]. Declaring a parameter name twice keeps the
/// first position and the last declaration.
#[derive(Debug, Clone)]
pub struct ToolSpecBuilder {
    spec: ToolSpec,
}

impl ToolSpecBuilder {
    pub fn number(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(ParamSpec::number(name).with_description(description))
    }

    pub fn string(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(ParamSpec::string(name).with_description(description))
    }

    pub fn string_enum<S: AsRef<str>>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[S],
    ) -> Self {
        self.param(ParamSpec::string_enum(name, values).with_description(description))
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        match self.spec.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.spec.params.push(param),
        }
        self
    }

    pub fn build(self) -> ToolSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_strict_function_schema() {
        let spec = ToolSpec::builder("get_weather", "Current weather for a city")
            .param(ParamSpec::string("city"))
            .param(ParamSpec::string_enum("unit", &["celsius", "fahrenheit"]))
            .param(ParamSpec::number("days"))
            .build();

        assert_eq!(
            spec.to_wire(),
            json!({
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Current weather for a city",
                    "strict": true,
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "city": {"type": "string"},
                            "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]},
                            "days": {"type": "number"}
                        },
                        "required": ["city", "unit", "days"],
                        "additionalProperties": false
                    }
                }
            })
        );
    }

    #[test]
    fn required_lists_params_in_declaration_order() {
        let spec = ToolSpec::builder("f", "")
            .number("z", "last letter")
            .number("a", "first letter")
            .build();
        assert_eq!(spec.parameters_schema()["required"], json!(["z", "a"]));
        assert_eq!(
            spec.parameters_schema()["properties"]["z"]["description"],
            "last letter"
        );
    }

    #[test]
    fn redeclared_param_is_replaced_in_place() {
        let spec = ToolSpec::builder("f", "")
            .string("x", "first")
            .number("y", "")
            .number("x", "second")
            .build();
        let names: Vec<_> = spec.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(spec.param("x").map(|p| p.kind), Some(ParamKind::Number));
    }

    #[test]
    fn tool_without_params_has_empty_object_schema() {
        let spec = ToolSpec::builder("now", "Current time").build();
        assert_eq!(
            spec.parameters_schema(),
            json!({"type": "object", "properties": {}, "required": [], "additionalProperties": false})
        );
    }
}
