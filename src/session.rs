//! The single shared browser session and the lock that serializes access to it.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::driver::{Driver, DriverResult, ElementHandle};
use crate::error::ActionError;
use crate::resolver::{self, Selector, WaitSpec};

/// Default bound for the post-navigation "document ready" wait.
pub const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

const READY_STATE_SCRIPT: &str = "return document.readyState";

/// Browser session state handed to every action handler.
///
/// A `Session` is only reachable through [`SessionContext::lock`], so a handler
/// holding `&Session` always runs with the session lock held.
pub struct Session {
    driver: Arc<dyn Driver>,
    page_load_timeout: Duration,
}

impl Session {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
        }
    }

    pub fn with_page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    pub fn page_load_timeout(&self) -> Duration {
        self.page_load_timeout
    }

    /// Resolve a CSS selector to exactly one element.
    pub async fn find(&self, css: &str) -> Result<ElementHandle, ActionError> {
        resolver::resolve(self.driver(), &Selector::css(css)).await
    }

    /// Resolve every element matching `selector`.
    pub async fn find_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>, ActionError> {
        resolver::resolve_all(self.driver(), selector).await
    }

    /// Reconstructable selector string for `element`.
    pub async fn selector_for(&self, element: &ElementHandle) -> Result<String, ActionError> {
        resolver::synthesize_selector(self.driver(), element).await
    }

    /// Block until `document.readyState` is `complete` or the page-load timeout passes.
    pub async fn wait_for_page_ready(&self) -> Result<(), ActionError> {
        let driver = self.driver();
        resolver::wait_until(
            WaitSpec::new(self.page_load_timeout),
            "document ready",
            move || async move { ready_state(driver).await.map(|state| state == "complete") },
        )
        .await
    }
}

async fn ready_state(driver: &dyn Driver) -> DriverResult<String> {
    let value = driver.execute_script(READY_STATE_SCRIPT, Vec::new()).await?;
    Ok(match value {
        Value::String(state) => state,
        _ => String::new(),
    })
}

/// Owner of the session and its mutual-exclusion lock.
///
/// At most one action runs against the browser at a time; concurrent callers
/// queue on the lock in arrival order.
pub struct SessionContext {
    session: Mutex<Session>,
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// Acquire exclusive access to the session.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }

    /// Close the browser once any in-flight action has finished.
    pub async fn shutdown(&self) -> DriverResult<()> {
        let session = self.lock().await;
        session.driver().quit().await
    }
}
