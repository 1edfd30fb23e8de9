//! Declarative tool schemas.
//!
//! Every tool publishes a [`ToolSpec`] built once at registration time: its
//! name, a description for the model, and an ordered parameter list with
//! types, defaults and required flags. This is what the reasoning engine
//! sees, and what the registry binds call arguments against.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Parameter types representable in the engine's JSON schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Float,
    StringList,
}

impl ParamType {
    /// JSON schema fragment for this type.
    pub fn json_schema(&self) -> Value {
        match self {
            ParamType::String => json!({ "type": "string" }),
            ParamType::Integer => json!({ "type": "integer" }),
            ParamType::Boolean => json!({ "type": "boolean" }),
            ParamType::Float => json!({ "type": "number" }),
            ParamType::StringList => json!({ "type": "array", "items": { "type": "string" } }),
        }
    }

    /// Short name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Float => "number",
            ParamType::StringList => "list of strings",
        }
    }
}

/// One parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as the model must supply it.
    pub name: String,
    /// Declared type.
    pub ty: ParamType,
    /// Description shown to the model.
    pub description: String,
    /// Default applied when the argument is missing.
    pub default: Option<Value>,
    /// Whether the parameter may be absent without a default.
    pub nullable: bool,
}

impl ParamSpec {
    /// A parameter that must always be supplied.
    pub fn required(name: impl Into<String>, ty: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            description: description.into(),
            default: None,
            nullable: false,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(
        name: impl Into<String>,
        ty: ParamType,
        description: impl Into<String>,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            description: description.into(),
            default: Some(default.into()),
            nullable: false,
        }
    }

    /// A parameter that may be left out entirely (no default).
    pub fn optional(name: impl Into<String>, ty: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            description: description.into(),
            default: None,
            nullable: true,
        }
    }

    /// True when the caller must provide a value.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.nullable
    }
}

/// Schema of a callable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool name within a registry.
    pub name: String,
    /// Description shown to the model.
    pub description: String,
    /// Ordered parameter list.
    pub parameters: Vec<ParamSpec>,
}

impl ToolSpec {
    /// Create a spec with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter.
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Return a copy of this spec under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// JSON schema object describing the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut schema = param.ty.json_schema();
            if let Value::Object(ref mut obj) = schema {
                obj.insert("description".to_string(), Value::String(param.description.clone()));
                if let Some(ref default) = param.default {
                    obj.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(param.name.clone(), schema);
            if param.is_required() {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
