//! Argument validation against an action descriptor.

use serde_json::{Map, Value};

use super::args::{ActionArgs, ArgValue};
use crate::catalog::{ActionDescriptor, ParameterSpec, SchemaKind};

/// First argument that violates the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub parameter: String,
    pub reason: String,
}

impl Violation {
    fn new(parameter: &str, reason: impl Into<String>) -> Self {
        Self {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

/// Check `args` against `descriptor` and coerce them into [`ActionArgs`].
///
/// Unknown argument names are rejected. Required parameters must be present
/// (a nullable required parameter may be explicitly `null`); non-nullable
/// parameters never accept `null`.
pub fn validate(descriptor: &ActionDescriptor, args: &Map<String, Value>) -> Result<ActionArgs, Violation> {
    if let Some(unknown) = args.keys().find(|name| descriptor.parameter(name).is_none()) {
        return Err(Violation::new(unknown, "unknown parameter"));
    }

    let mut validated = ActionArgs::new();

    for param in &descriptor.parameters {
        match args.get(&param.name) {
            None if param.required => {
                return Err(Violation::new(&param.name, "missing required parameter"));
            }
            None => {}
            Some(Value::Null) if param.nullable => {}
            Some(Value::Null) => {
                return Err(Violation::new(&param.name, "must not be null"));
            }
            Some(value) => validated.insert(param.name.clone(), coerce(param, value)?),
        }
    }

    Ok(validated)
}

fn coerce(param: &ParameterSpec, value: &Value) -> Result<ArgValue, Violation> {
    let mismatch = |expected: &str| {
        Violation::new(
            &param.name,
            format!("expected {expected}, got {}", type_name(value)),
        )
    };

    match &param.kind {
        SchemaKind::Text => value
            .as_str()
            .map(|s| ArgValue::Text(s.to_string()))
            .ok_or_else(|| mismatch("a string")),
        SchemaKind::Number => value
            .as_f64()
            .map(ArgValue::Number)
            .ok_or_else(|| mismatch("a number")),
        SchemaKind::Boolean => value
            .as_bool()
            .map(ArgValue::Boolean)
            .ok_or_else(|| mismatch("a boolean")),
        SchemaKind::Enum(members) => {
            let name = value.as_str().ok_or_else(|| mismatch("a string"))?;
            if members.iter().any(|m| m == name) {
                Ok(ArgValue::Enum(name.to_string()))
            } else {
                Err(Violation::new(
                    &param.name,
                    format!("`{name}` is not one of {}", members.join(", ")),
                ))
            }
        }
        SchemaKind::Untyped => Ok(ArgValue::Untyped(value.clone())),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
