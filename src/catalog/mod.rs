//! Action descriptor catalog.
//!
//! Actions are declared in a static table ([`ActionDef`]); the registry turns
//! that table into an immutable [`ActionCatalog`] once at startup.

pub mod registry;
pub mod type_mapper;
pub mod types;

pub use registry::{ActionCatalog, ActionDef, CATALOG_VERSION, CatalogEntry, Handler, build_catalog};
pub use types::{
    ActionDescriptor, ActionDoc, DeclaredParam, DeclaredType, ParamDoc, ParameterSpec, SchemaKind,
};
