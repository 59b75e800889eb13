//! Declared parameter type → schema kind.

use super::types::{DeclaredType, SchemaKind};

/// Result of mapping a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub kind: SchemaKind,
    pub nullable: bool,
}

/// Why a declared type has no schema mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    Opaque(&'static str),
    EmptyEnum,
    DuplicateEnumValue(&'static str),
}

/// Map `declared` to its schema kind.
pub fn map(declared: &DeclaredType) -> Result<MappedType, MapError> {
    let kind = match declared {
        DeclaredType::Text => SchemaKind::Text,
        DeclaredType::Integer | DeclaredType::Float => SchemaKind::Number,
        DeclaredType::Boolean => SchemaKind::Boolean,
        DeclaredType::Enum(names) => SchemaKind::Enum(enum_values(*names)?),
        DeclaredType::Optional(inner) => {
            let inner = map(inner)?;
            return Ok(MappedType {
                kind: inner.kind,
                nullable: true,
            });
        }
        DeclaredType::Opaque(type_name) => return Err(MapError::Opaque(*type_name)),
    };

    Ok(MappedType {
        kind,
        nullable: false,
    })
}

fn enum_values(names: &'static [&'static str]) -> Result<Vec<String>, MapError> {
    if names.is_empty() {
        return Err(MapError::EmptyEnum);
    }
    let mut values: Vec<String> = Vec::with_capacity(names.len());
    for &name in names {
        if values.iter().any(|v| v == name) {
            return Err(MapError::DuplicateEnumValue(name));
        }
        values.push(name.to_string());
    }
    Ok(values)
}
