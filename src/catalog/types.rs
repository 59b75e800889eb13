//! Core types for declared actions and their derived descriptors.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Semantic type of a declared handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Text,
    Integer,
    Float,
    Boolean,
    /// Closed enumeration, by member name in declaration order.
    Enum(&'static [&'static str]),
    /// The inner type, or absence.
    Optional(&'static DeclaredType),
    /// A type with no schema mapping, by its Rust type name.
    Opaque(&'static str),
}

/// One parameter of a handler signature, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredParam {
    pub name: &'static str,
    pub ty: DeclaredType,
    pub has_default: bool,
}

impl DeclaredParam {
    pub const fn required(name: &'static str, ty: DeclaredType) -> Self {
        Self {
            name,
            ty,
            has_default: false,
        }
    }

    pub const fn defaulted(name: &'static str, ty: DeclaredType) -> Self {
        Self {
            name,
            ty,
            has_default: true,
        }
    }
}

/// Documentation for one parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamDoc {
    pub name: &'static str,
    pub description: &'static str,
}

impl ParamDoc {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

/// Structured documentation attached to an action.
#[derive(Debug, Clone, Copy)]
pub struct ActionDoc {
    pub description: &'static str,
    pub params: &'static [ParamDoc],
}

/// Schema primitive a parameter maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Text,
    Number,
    Boolean,
    Enum(Vec<String>),
    /// The declared type could not be mapped.
    Untyped,
}

impl SchemaKind {
    /// JSON Schema `type` keyword, if the kind has one.
    pub fn json_type(&self) -> Option<&'static str> {
        match self {
            Self::Text | Self::Enum(_) => Some("string"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Untyped => None,
        }
    }
}

/// Derived schema for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: SchemaKind,
    pub nullable: bool,
    pub required: bool,
    pub description: String,
}

impl ParameterSpec {
    /// The `properties.<name>` entry of the advertised schema.
    pub fn property_schema(&self) -> Value {
        let mut prop = Map::new();
        if let Some(ty) = self.kind.json_type() {
            let ty = if self.nullable {
                json!([ty, "null"])
            } else {
                json!(ty)
            };
            prop.insert("type".to_string(), ty);
        }
        if let SchemaKind::Enum(values) = &self.kind {
            prop.insert("enum".to_string(), json!(values));
        }
        prop.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        Value::Object(prop)
    }
}

/// Schema metadata for one registered action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    pub qualified_name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ActionDescriptor {
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of required parameters, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// JSON-Schema-shaped input schema advertised to clients.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.property_schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(self.required()));
        schema
    }
}
