//! Element resolution and waiting.
//!
//! `resolve` and `resolve_all` are single immediate lookups. Waiting is always
//! explicit through [`wait::wait_until`], so a caller decides whether an absent
//! element is an error or something to poll for.

pub mod synth;
pub mod text;
pub mod wait;

use std::fmt;

use crate::driver::{Driver, DriverError, ElementHandle};
use crate::error::ActionError;

pub use synth::synthesize_selector;
pub use text::TextMatch;
pub use wait::{POLL_INTERVAL, WaitSpec, wait_until};

/// Locator strategy for a [`Selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectorKind {
    #[default]
    Css,
    XPath,
    Id,
    Name,
    Tag,
}

impl SelectorKind {
    /// Strategy by its short name; unknown names fall back to CSS.
    pub fn from_name(name: &str) -> Self {
        match name {
            "xpath" => Self::XPath,
            "id" => Self::Id,
            "name" => Self::Name,
            "tag" => Self::Tag,
            _ => Self::Css,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::Tag => "tag",
        }
    }
}

/// A string-plus-kind locator. The value is used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    pub kind: SelectorKind,
    pub value: String,
}

impl Selector {
    pub fn new(kind: SelectorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(SelectorKind::Css, value)
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(SelectorKind::XPath, value)
    }

    pub fn tag(value: impl Into<String>) -> Self {
        Self::new(SelectorKind::Tag, value)
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::new(SelectorKind::Name, value)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::css(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind.as_str(), self.value)
    }
}

/// Resolve `selector` to exactly one element with a single lookup.
pub async fn resolve(driver: &dyn Driver, selector: &Selector) -> Result<ElementHandle, ActionError> {
    match driver.find_element(selector).await {
        Ok(handle) => Ok(handle),
        Err(DriverError::NoSuchElement(_)) => Err(ActionError::ElementNotFound {
            selector: selector.value.clone(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Resolve every element matching `selector`; an empty list is not an error.
pub async fn resolve_all(
    driver: &dyn Driver,
    selector: &Selector,
) -> Result<Vec<ElementHandle>, ActionError> {
    Ok(driver.find_elements(selector).await?)
}
