//! Builds the action catalog from a declared action table.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use super::type_mapper::{self, MapError};
use super::types::{ActionDescriptor, ActionDoc, DeclaredParam, ParameterSpec, SchemaKind};
use crate::dispatch::ActionArgs;
use crate::error::{ActionError, SchemaError};
use crate::session::Session;

/// Version of the descriptor format.
pub const CATALOG_VERSION: u32 = 1;

/// Handler invoked with the locked session and validated arguments.
pub type Handler = for<'a> fn(&'a Session, ActionArgs) -> BoxFuture<'a, Result<Value, ActionError>>;

/// One row of an action table.
#[derive(Clone, Copy)]
pub struct ActionDef {
    pub name: &'static str,
    /// Handler parameters in declaration order.
    pub signature: &'static [DeclaredParam],
    pub doc: ActionDoc,
    pub handler: Handler,
}

/// A registered action: its descriptor plus the handler it dispatches to.
#[derive(Clone)]
pub struct CatalogEntry {
    pub descriptor: ActionDescriptor,
    pub handler: Handler,
}

/// Immutable catalog of registered actions, in registration order.
pub struct ActionCatalog {
    namespace: String,
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    schema_errors: Vec<SchemaError>,
}

#[derive(Serialize)]
struct CatalogDocument<'a> {
    version: u32,
    namespace: &'a str,
    actions: Vec<&'a ActionDescriptor>,
}

impl ActionCatalog {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn get(&self, qualified_name: &str) -> Option<&CatalogEntry> {
        self.index.get(qualified_name).map(|&i| &self.entries[i])
    }

    pub fn descriptor(&self, qualified_name: &str) -> Option<&ActionDescriptor> {
        self.get(qualified_name).map(|entry| &entry.descriptor)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors().map(|d| d.qualified_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Problems reported while the catalog was built.
    pub fn schema_errors(&self) -> &[SchemaError] {
        &self.schema_errors
    }

    /// Versioned JSON form of every descriptor.
    pub fn to_json(&self) -> Value {
        let document = CatalogDocument {
            version: CATALOG_VERSION,
            namespace: &self.namespace,
            actions: self.descriptors().collect(),
        };
        serde_json::to_value(document).unwrap_or(Value::Null)
    }
}

/// Register every action in `actions` under `namespace`.
///
/// Parameters follow the declared signature order. Per-parameter problems are
/// logged and recorded on the catalog but never drop the action: an unmappable
/// type degrades to [`SchemaKind::Untyped`], an undocumented parameter gets an
/// empty description, and a documented-but-undeclared parameter is ignored.
pub fn build_catalog(actions: &[ActionDef], namespace: &str) -> ActionCatalog {
    let mut entries = Vec::with_capacity(actions.len());
    let mut index = HashMap::with_capacity(actions.len());
    let mut schema_errors = Vec::new();

    for def in actions {
        let qualified_name = format!("{namespace}.{}", def.name);

        if index.contains_key(&qualified_name) {
            report(
                &mut schema_errors,
                SchemaError::DuplicateAction {
                    name: qualified_name,
                },
            );
            continue;
        }

        for doc in def.doc.params {
            if !def.signature.iter().any(|p| p.name == doc.name) {
                report(
                    &mut schema_errors,
                    SchemaError::UndeclaredParameter {
                        action: qualified_name.clone(),
                        parameter: doc.name.to_string(),
                    },
                );
            }
        }

        let parameters = def
            .signature
            .iter()
            .map(|param| parameter_spec(&qualified_name, def, param, &mut schema_errors))
            .collect();

        index.insert(qualified_name.clone(), entries.len());
        entries.push(CatalogEntry {
            descriptor: ActionDescriptor {
                qualified_name,
                description: def.doc.description.to_string(),
                parameters,
            },
            handler: def.handler,
        });
    }

    log::debug!(
        "Registered {} actions under namespace '{}' ({} schema problems)",
        entries.len(),
        namespace,
        schema_errors.len()
    );

    ActionCatalog {
        namespace: namespace.to_string(),
        entries,
        index,
        schema_errors,
    }
}

fn parameter_spec(
    action: &str,
    def: &ActionDef,
    param: &DeclaredParam,
    schema_errors: &mut Vec<SchemaError>,
) -> ParameterSpec {
    let description = def
        .doc
        .params
        .iter()
        .find(|doc| doc.name == param.name)
        .map(|doc| doc.description.to_string())
        .unwrap_or_default();

    let (kind, nullable) = match type_mapper::map(&param.ty) {
        Ok(mapped) => (mapped.kind, mapped.nullable),
        Err(e) => {
            let action = action.to_string();
            let parameter = param.name.to_string();
            let err = match e {
                MapError::Opaque(type_name) => SchemaError::UnmappableType {
                    action,
                    parameter,
                    type_name: type_name.to_string(),
                },
                MapError::EmptyEnum => SchemaError::EmptyEnum { action, parameter },
                MapError::DuplicateEnumValue(value) => SchemaError::DuplicateEnumValue {
                    action,
                    parameter,
                    value: value.to_string(),
                },
            };
            report(schema_errors, err);
            (SchemaKind::Untyped, false)
        }
    };

    ParameterSpec {
        name: param.name.to_string(),
        kind,
        nullable,
        required: !param.has_default,
        description,
    }
}

fn report(schema_errors: &mut Vec<SchemaError>, err: SchemaError) {
    log::warn!("{err}");
    schema_errors.push(err);
}
