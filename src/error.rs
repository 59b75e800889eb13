//! Error taxonomy for registration, dispatch and action execution.

use std::path::PathBuf;
use std::time::Duration;

use crate::driver::DriverError;

/// Registration-time problem with a declared action. Never fatal: the catalog
/// still builds with the affected parameter degraded or skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("cannot map type `{type_name}` of parameter `{parameter}` in {action}")]
    UnmappableType {
        action: String,
        parameter: String,
        type_name: String,
    },

    #[error("enumeration for parameter `{parameter}` in {action} has no members")]
    EmptyEnum { action: String, parameter: String },

    #[error("enumeration for parameter `{parameter}` in {action} repeats `{value}`")]
    DuplicateEnumValue {
        action: String,
        parameter: String,
        value: String,
    },

    #[error("documented parameter `{parameter}` is not declared by {action}")]
    UndeclaredParameter { action: String, parameter: String },

    #[error("action {name} is registered more than once")]
    DuplicateAction { name: String },
}

/// Failure raised inside an action handler.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A selector that had to match exactly one element matched none.
    #[error("no element matches selector `{selector}`")]
    ElementNotFound { selector: String },

    /// A wait primitive ran out of time.
    #[error("timed out after {timeout:?} waiting for {what}")]
    TimedOut { what: String, timeout: Duration },

    /// An argument passed schema validation but is unusable by the handler.
    #[error("invalid value for `{parameter}`: {reason}")]
    Argument { parameter: String, reason: String },

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ActionError {
    pub fn argument(parameter: &str, reason: impl Into<String>) -> Self {
        Self::Argument {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

/// Typed failure surfaced to the caller of [`crate::dispatch::Dispatcher::dispatch`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown action: {name}")]
    UnknownAction { name: String },

    #[error("invalid argument `{parameter}` for {action}: {reason}")]
    Validation {
        action: String,
        parameter: String,
        reason: String,
    },

    #[error("{action}: no element matches selector `{selector}`")]
    ElementNotFound { action: String, selector: String },

    #[error("{action}: timed out after {timeout:?} waiting for {what}")]
    TimedOut {
        action: String,
        what: String,
        timeout: Duration,
    },

    #[error("{action} failed: {source}")]
    Handler {
        action: String,
        #[source]
        source: ActionError,
    },
}

impl DispatchError {
    /// Categorize a handler failure for `action`.
    pub fn from_action(action: &str, err: ActionError) -> Self {
        let action = action.to_string();
        match err {
            ActionError::ElementNotFound { selector } => Self::ElementNotFound { action, selector },
            ActionError::TimedOut { what, timeout } => Self::TimedOut {
                action,
                what,
                timeout,
            },
            ActionError::Argument { parameter, reason } => Self::Validation {
                action,
                parameter,
                reason,
            },
            source => Self::Handler { action, source },
        }
    }

    /// Category name reported to the client.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownAction { .. } | Self::ElementNotFound { .. } => "NotFoundError",
            Self::Validation { .. } => "ValidationError",
            Self::TimedOut { .. } => "TimedOut",
            Self::Handler { .. } => "HandlerError",
        }
    }

    /// Offending parameter, for validation failures.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::Validation { parameter, .. } => Some(parameter),
            _ => None,
        }
    }

    /// Qualified action name the failure belongs to, when one was resolved.
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::UnknownAction { .. } => None,
            Self::Validation { action, .. }
            | Self::ElementNotFound { action, .. }
            | Self::TimedOut { action, .. }
            | Self::Handler { action, .. } => Some(action),
        }
    }
}
