//! Validated, coerced arguments handed to action handlers.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ActionError;

/// A single argument after validation against its parameter kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// One of the advertised member names.
    Enum(String),
    /// Passed through unchecked for untyped parameters.
    Untyped(Value),
}

/// Arguments of one call. Absent and null optional parameters are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArgs {
    values: HashMap<String, ArgValue>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: &str, value: ArgValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn text(&self, name: &str) -> Result<&str, ActionError> {
        self.opt_text(name)?.ok_or_else(|| missing(name))
    }

    pub fn opt_text(&self, name: &str) -> Result<Option<&str>, ActionError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ArgValue::Text(s)) => Ok(Some(s)),
            Some(_) => Err(mismatch(name, "a string")),
        }
    }

    pub fn number(&self, name: &str) -> Result<f64, ActionError> {
        match self.values.get(name) {
            None => Err(missing(name)),
            Some(ArgValue::Number(n)) => Ok(*n),
            Some(_) => Err(mismatch(name, "a number")),
        }
    }

    /// Number argument that must be integral.
    pub fn integer(&self, name: &str) -> Result<i64, ActionError> {
        let n = self.number(name)?;
        if n.fract() != 0.0 || !n.is_finite() || n.abs() > i64::MAX as f64 {
            return Err(mismatch(name, "an integer"));
        }
        Ok(n as i64)
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ActionError> {
        match self.values.get(name) {
            None => Err(missing(name)),
            Some(ArgValue::Boolean(b)) => Ok(*b),
            Some(_) => Err(mismatch(name, "a boolean")),
        }
    }

    pub fn enumeration(&self, name: &str) -> Result<&str, ActionError> {
        self.opt_enumeration(name)?.ok_or_else(|| missing(name))
    }

    pub fn opt_enumeration(&self, name: &str) -> Result<Option<&str>, ActionError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ArgValue::Enum(s)) => Ok(Some(s)),
            Some(_) => Err(mismatch(name, "an enumeration member")),
        }
    }
}

fn missing(name: &str) -> ActionError {
    ActionError::argument(name, "missing required parameter")
}

fn mismatch(name: &str, expected: &str) -> ActionError {
    ActionError::argument(name, format!("expected {expected}"))
}
