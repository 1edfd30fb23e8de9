//! Binding call arguments onto a tool's declared parameters.

use std::collections::HashMap;

use brain_core::{ParamSpec, ParamType, ToolSpec};
use serde_json::{Number, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::tool::ToolArgs;

/// Bind raw call arguments against `spec`.
///
/// Missing optional parameters receive their default; `null` on a nullable
/// parameter binds as absent; values are coerced to the declared type where
/// the conversion is lossless. Arguments the tool does not declare are
/// dropped.
pub fn bind(spec: &ToolSpec, mut arguments: HashMap<String, Value>) -> Result<ToolArgs, ToolError> {
    let mut params = HashMap::with_capacity(spec.parameters.len());

    for param in &spec.parameters {
        let supplied = arguments.remove(&param.name);
        let bound = match supplied {
            Some(Value::Null) | None => missing(param)?,
            Some(value) => Some(coerce(param, value)?),
        };
        if let Some(value) = bound {
            params.insert(param.name.clone(), value);
        }
    }

    for extra in arguments.keys() {
        debug!("Ignoring undeclared argument '{}' for tool '{}'", extra, spec.name);
    }

    Ok(ToolArgs::new(params))
}

fn missing(param: &ParamSpec) -> Result<Option<Value>, ToolError> {
    match param.default {
        Some(ref default) => Ok(Some(default.clone())),
        None if param.nullable => Ok(None),
        None => Err(ToolError::MissingParameter(param.name.clone())),
    }
}

fn coerce(param: &ParamSpec, value: Value) -> Result<Value, ToolError> {
    let coerced = match (param.ty, value) {
        (ParamType::String, Value::String(s)) => Some(Value::String(s)),
        (ParamType::String, Value::Number(n)) => Some(Value::String(n.to_string())),

        (ParamType::Integer, Value::Number(n)) => integer_from_number(&n),
        (ParamType::Integer, Value::String(s)) => {
            s.trim().parse::<i64>().ok().map(|i| Value::Number(i.into()))
        }

        (ParamType::Float, Value::Number(n)) => Some(Value::Number(n)),
        (ParamType::Float, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),

        (ParamType::Boolean, Value::Bool(b)) => Some(Value::Bool(b)),
        (ParamType::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },

        (ParamType::StringList, Value::String(s)) => Some(Value::Array(vec![Value::String(s)])),
        (ParamType::StringList, Value::Array(items)) => {
            if items.iter().all(Value::is_string) {
                Some(Value::Array(items))
            } else {
                None
            }
        }

        _ => None,
    };

    coerced.ok_or_else(|| ToolError::InvalidParameter {
        name: param.name.clone(),
        reason: format!("expected {}", param.ty.as_str()),
    })
}

fn integer_from_number(n: &Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::Number(i.into()));
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(Value::Number((f as i64).into()))
    } else {
        None
    }
}
