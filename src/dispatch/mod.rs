//! Routes named action calls to their handlers.

pub mod args;
pub mod validate;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::catalog::ActionCatalog;
use crate::driver::DriverResult;
use crate::error::DispatchError;
use crate::session::SessionContext;

pub use args::{ActionArgs, ArgValue};
pub use validate::{Violation, validate};

/// Looks up, validates and runs actions against the shared session.
pub struct Dispatcher {
    catalog: Arc<ActionCatalog>,
    context: SessionContext,
}

impl Dispatcher {
    pub fn new(catalog: Arc<ActionCatalog>, context: SessionContext) -> Self {
        Self { catalog, context }
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Invoke `qualified_name` with a JSON argument object.
    ///
    /// Lookup and validation happen before the session lock is taken, so a bad
    /// call never waits behind a running action and never touches the browser.
    pub async fn dispatch(
        &self,
        qualified_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        let entry = self
            .catalog
            .get(qualified_name)
            .ok_or_else(|| DispatchError::UnknownAction {
                name: qualified_name.to_string(),
            })?;

        let args = validate(&entry.descriptor, arguments).map_err(|v| DispatchError::Validation {
            action: qualified_name.to_string(),
            parameter: v.parameter,
            reason: v.reason,
        })?;

        log::debug!("Dispatching {} with {} argument(s)", qualified_name, args.len());

        let session = self.context.lock().await;
        let result = (entry.handler)(&session, args).await;
        drop(session);

        result.map_err(|e| {
            let err = DispatchError::from_action(qualified_name, e);
            log::warn!("{err}");
            err
        })
    }

    /// Close the browser after any in-flight action completes.
    pub async fn shutdown(&self) -> DriverResult<()> {
        self.context.shutdown().await
    }
}
