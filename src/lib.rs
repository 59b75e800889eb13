//! Browser automation exposed as a catalog of schema-typed MCP tools.
//!
//! Actions are declared once in [`actions::BROWSER_ACTIONS`]. At startup the
//! [`catalog`] derives a tool descriptor per action, the [`dispatch`] layer
//! validates incoming calls against those descriptors, and handlers drive the
//! page through the [`driver::Driver`] trait under a single session lock.

pub mod actions;
pub mod catalog;
pub mod cli;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod resolver;
pub mod session;
pub mod stdio;

pub use catalog::{ActionCatalog, ActionDescriptor, build_catalog};
pub use dispatch::Dispatcher;
pub use error::{ActionError, DispatchError, SchemaError};
