//! Browser-driver collaborator.
//!
//! The action layer never talks to a browser directly. Everything it needs from
//! the page goes through the [`Driver`] trait, which the WebDriver backend in
//! [`webdriver`] implements on top of `fantoccini`. Tests substitute an
//! in-memory implementation.

pub mod webdriver;

use async_trait::async_trait;
use serde_json::Value;

use crate::resolver::Selector;

pub use webdriver::{BrowserKind, WebDriverConfig, WebDriverSession};

/// Result alias for driver calls.
pub type DriverResult<T> = Result<T, DriverError>;

/// Failures reported by the driver collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    /// The lookup matched nothing.
    #[error("no element matches {0}")]
    NoSuchElement(String),

    /// The handle refers to a node that is no longer attached to the page.
    #[error("stale element reference")]
    StaleElement,

    /// Script evaluation threw inside the page.
    #[error("script error: {0}")]
    Script(String),

    /// Any other WebDriver command failure.
    #[error("webdriver command failed: {0}")]
    Command(String),
}

impl DriverError {
    /// Errors a polling wait treats as "not rendered yet" rather than fatal.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NoSuchElement(_) | Self::StaleElement)
    }
}

/// Opaque, driver-scoped reference to a live DOM node.
///
/// Only valid for the page state it was resolved under. It is never handed to
/// the client; list results are converted to selector strings instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Argument passed to [`Driver::execute_script`] as `arguments[i]`.
#[derive(Debug, Clone)]
pub enum ScriptArg {
    Value(Value),
    Element(ElementHandle),
}

impl From<Value> for ScriptArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&ElementHandle> for ScriptArg {
    fn from(element: &ElementHandle) -> Self {
        Self::Element(element.clone())
    }
}

/// Operations consumed from the browser-automation driver.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn navigate(&self, url: &str) -> DriverResult<()>;
    async fn refresh(&self) -> DriverResult<()>;
    async fn back(&self) -> DriverResult<()>;
    async fn forward(&self) -> DriverResult<()>;

    /// Full serialized DOM of the current page.
    async fn page_source(&self) -> DriverResult<String>;

    /// First match for `selector`, or [`DriverError::NoSuchElement`].
    async fn find_element(&self, selector: &Selector) -> DriverResult<ElementHandle>;
    /// Every match for `selector` in document order; empty when nothing matches.
    async fn find_elements(&self, selector: &Selector) -> DriverResult<Vec<ElementHandle>>;
    /// Matches for `selector` among the descendants of `parent`.
    async fn find_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> DriverResult<Vec<ElementHandle>>;

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> DriverResult<Value>;

    async fn click(&self, element: &ElementHandle) -> DriverResult<()>;
    async fn double_click(&self, element: &ElementHandle) -> DriverResult<()>;
    async fn context_click(&self, element: &ElementHandle) -> DriverResult<()>;
    async fn hover(&self, element: &ElementHandle) -> DriverResult<()>;
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()>;
    async fn clear(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Attribute value, falling back to the DOM property of the same name.
    async fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>>;
    /// Rendered (visible) text of the element.
    async fn text(&self, element: &ElementHandle) -> DriverResult<String>;
    async fn tag_name(&self, element: &ElementHandle) -> DriverResult<String>;
    async fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool>;
    async fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool>;
    async fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// PNG of the current viewport.
    async fn screenshot(&self) -> DriverResult<Vec<u8>>;
    /// PNG of a single element.
    async fn element_screenshot(&self, element: &ElementHandle) -> DriverResult<Vec<u8>>;

    /// End the browser session.
    async fn quit(&self) -> DriverResult<()>;
}
