//! WebDriver backend for the [`Driver`] trait, built on `fantoccini`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::actions::{
    InputSource, MOUSE_BUTTON_LEFT, MOUSE_BUTTON_RIGHT, MouseActions, PointerAction,
};
use fantoccini::elements::{Element, ElementRef};
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use rand::Rng;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

use super::{Driver, DriverError, DriverResult, ElementHandle, ScriptArg};
use crate::resolver::{Selector, SelectorKind};
use crate::resolver::synth::css_string;

/// Browser family, used to pick the vendor capability block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Firefox,
}

impl BrowserKind {
    fn browser_name(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Edge => "MicrosoftEdge",
            Self::Firefox => "firefox",
        }
    }
}

/// Settings for opening the WebDriver session.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// WebDriver server endpoint, e.g. `http://localhost:9515`
    pub url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// Timeout for each connection attempt
    pub connection_timeout: Duration,
    /// Maximum number of connection attempts
    pub max_retries: u32,
    /// Initial backoff duration, doubles on each retry
    pub retry_backoff: Duration,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".to_string(),
            browser: BrowserKind::Edge,
            headless: false,
            connection_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

impl WebDriverConfig {
    /// Capabilities for the new-session request.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "browserName".to_string(),
            Value::String(self.browser.browser_name().to_string()),
        );

        match self.browser {
            BrowserKind::Chrome | BrowserKind::Edge => {
                let mut args = vec!["--disable-blink-features=AutomationControlled"];
                if self.headless {
                    args.push("--headless=new");
                } else {
                    args.push("--start-maximized");
                }
                let key = if self.browser == BrowserKind::Chrome {
                    "goog:chromeOptions"
                } else {
                    "ms:edgeOptions"
                };
                caps.insert(key.to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                if self.headless {
                    caps.insert(
                        "moz:firefoxOptions".to_string(),
                        json!({ "args": ["-headless"] }),
                    );
                }
            }
        }

        caps
    }
}

/// Live WebDriver session.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Open a browser session, retrying with exponential backoff.
    ///
    /// Backoff starts at `config.retry_backoff` and doubles on each retry,
    /// capped at 10 seconds, with up to 25% jitter. Each attempt is bounded by
    /// `config.connection_timeout` and the whole loop can be cancelled via
    /// `shutdown_token`.
    pub async fn connect(config: &WebDriverConfig, shutdown_token: &CancellationToken) -> Result<Self> {
        let url = config.url.trim_end_matches('/');
        let max_attempts = config.max_retries.max(1);
        let mut backoff = config.retry_backoff;
        let mut attempt = 1;

        loop {
            log::debug!(
                "WebDriver connection attempt {attempt}/{max_attempts} to {url} (timeout: {:?})",
                config.connection_timeout
            );

            let mut builder =
                ClientBuilder::rustls().context("Failed to initialize rustls connector")?;
            builder.capabilities(config.capabilities());

            let result = tokio::select! {
                res = builder.connect(url) => Some(res),
                () = tokio::time::sleep(config.connection_timeout) => None,
                () = shutdown_token.cancelled() => {
                    log::info!("Connection attempt cancelled during shutdown");
                    anyhow::bail!("Connection cancelled during shutdown");
                }
            };

            let failure = match result {
                Some(Ok(client)) => {
                    log::info!("Connected to WebDriver at {url} on attempt {attempt}/{max_attempts}");
                    return Ok(Self { client });
                }
                Some(Err(e)) => e.to_string(),
                None => format!("timed out after {:?}", config.connection_timeout),
            };

            if attempt == max_attempts {
                anyhow::bail!(
                    "Failed to open a WebDriver session at {} after {} attempt{}: {}",
                    url,
                    max_attempts,
                    if max_attempts == 1 { "" } else { "s" },
                    failure
                );
            }

            log::debug!(
                "Connection attempt {attempt}/{max_attempts} failed: {failure}. Retrying in {backoff:?}"
            );

            let jitter_max = (backoff.as_millis() / 4).max(1);
            let jitter = rand::rng().random_range(0..jitter_max);
            let sleep_duration = backoff + Duration::from_millis(jitter as u64);

            tokio::select! {
                () = tokio::time::sleep(sleep_duration) => {},
                () = shutdown_token.cancelled() => {
                    log::info!("Connection retry cancelled during backoff");
                    anyhow::bail!("Connection cancelled during shutdown");
                }
            }

            backoff = (backoff * 2).min(Duration::from_secs(10));
            attempt += 1;
        }
    }

    fn element(&self, handle: &ElementHandle) -> Element {
        Element::from_element_id(
            self.client.clone(),
            ElementRef::from(handle.id().to_string()),
        )
    }

    async fn pointer(&self, actions: MouseActions) -> DriverResult<()> {
        self.client.perform_actions(actions).await.map_err(map_cmd_error)?;
        if let Err(e) = self.client.release_actions().await {
            log::debug!("Failed to release input actions: {e}");
        }
        Ok(())
    }
}

/// Owned form of a [`Locator`]; name and tag selectors go through CSS.
enum OwnedLocator {
    Css(String),
    XPath(String),
    Id(String),
}

impl OwnedLocator {
    fn from_selector(selector: &Selector) -> Self {
        match selector.kind {
            SelectorKind::Css | SelectorKind::Tag => Self::Css(selector.value.clone()),
            SelectorKind::XPath => Self::XPath(selector.value.clone()),
            SelectorKind::Id => Self::Id(selector.value.clone()),
            SelectorKind::Name => Self::Css(format!("[name={}]", css_string(&selector.value))),
        }
    }

    fn locator(&self) -> Locator<'_> {
        match self {
            Self::Css(css) => Locator::Css(css),
            Self::XPath(xpath) => Locator::XPath(xpath),
            Self::Id(id) => Locator::Id(id),
        }
    }
}

fn handle_of(element: &Element) -> ElementHandle {
    ElementHandle::new(element.element_id().to_string())
}

fn map_cmd_error(err: CmdError) -> DriverError {
    if err.is_no_such_element() {
        return DriverError::NoSuchElement(err.to_string());
    }
    match &err {
        CmdError::Standard(wd) if wd.error == ErrorStatus::StaleElementReference => {
            DriverError::StaleElement
        }
        CmdError::Standard(wd) if wd.error == ErrorStatus::JavascriptError => {
            DriverError::Script(wd.message.to_string())
        }
        _ => DriverError::Command(err.to_string()),
    }
}

fn click_sequence(element: Element, button: u64, clicks: usize) -> MouseActions {
    let mut actions = MouseActions::new("mouse".to_string()).then(PointerAction::MoveToElement {
        element,
        duration: None,
        x: 0.0,
        y: 0.0,
    });
    for _ in 0..clicks {
        actions = actions
            .then(PointerAction::Down { button })
            .then(PointerAction::Up { button });
    }
    actions
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.client.goto(url).await.map_err(map_cmd_error)
    }

    async fn refresh(&self) -> DriverResult<()> {
        self.client.refresh().await.map_err(map_cmd_error)
    }

    async fn back(&self) -> DriverResult<()> {
        self.client.back().await.map_err(map_cmd_error)
    }

    async fn forward(&self) -> DriverResult<()> {
        self.client.forward().await.map_err(map_cmd_error)
    }

    async fn page_source(&self) -> DriverResult<String> {
        self.client.source().await.map_err(map_cmd_error)
    }

    async fn find_element(&self, selector: &Selector) -> DriverResult<ElementHandle> {
        let locator = OwnedLocator::from_selector(selector);
        match self.client.find(locator.locator()).await {
            Ok(element) => Ok(handle_of(&element)),
            Err(e) if e.is_no_such_element() => Err(DriverError::NoSuchElement(selector.to_string())),
            Err(e) => Err(map_cmd_error(e)),
        }
    }

    async fn find_elements(&self, selector: &Selector) -> DriverResult<Vec<ElementHandle>> {
        let locator = OwnedLocator::from_selector(selector);
        let elements = self
            .client
            .find_all(locator.locator())
            .await
            .map_err(map_cmd_error)?;
        Ok(elements.iter().map(handle_of).collect())
    }

    async fn find_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> DriverResult<Vec<ElementHandle>> {
        let locator = OwnedLocator::from_selector(selector);
        let elements = self
            .element(parent)
            .find_all(locator.locator())
            .await
            .map_err(map_cmd_error)?;
        Ok(elements.iter().map(handle_of).collect())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> DriverResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = match arg {
                ScriptArg::Value(value) => value,
                ScriptArg::Element(handle) => serde_json::to_value(self.element(&handle))
                    .map_err(|e| DriverError::Command(e.to_string()))?,
            };
            values.push(value);
        }
        self.client.execute(script, values).await.map_err(map_cmd_error)
    }

    async fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        self.element(element).click().await.map_err(map_cmd_error)
    }

    async fn double_click(&self, element: &ElementHandle) -> DriverResult<()> {
        self.pointer(click_sequence(self.element(element), MOUSE_BUTTON_LEFT, 2))
            .await
    }

    async fn context_click(&self, element: &ElementHandle) -> DriverResult<()> {
        self.pointer(click_sequence(self.element(element), MOUSE_BUTTON_RIGHT, 1))
            .await
    }

    async fn hover(&self, element: &ElementHandle) -> DriverResult<()> {
        self.pointer(click_sequence(self.element(element), MOUSE_BUTTON_LEFT, 0))
            .await
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()> {
        self.element(element).send_keys(text).await.map_err(map_cmd_error)
    }

    async fn clear(&self, element: &ElementHandle) -> DriverResult<()> {
        self.element(element).clear().await.map_err(map_cmd_error)
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        let element = self.element(element);
        if let Some(value) = element.attr(name).await.map_err(map_cmd_error)? {
            return Ok(Some(value));
        }
        element.prop(name).await.map_err(map_cmd_error)
    }

    async fn text(&self, element: &ElementHandle) -> DriverResult<String> {
        self.element(element).text().await.map_err(map_cmd_error)
    }

    async fn tag_name(&self, element: &ElementHandle) -> DriverResult<String> {
        self.element(element).tag_name().await.map_err(map_cmd_error)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.element(element).is_displayed().await.map_err(map_cmd_error)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.element(element).is_enabled().await.map_err(map_cmd_error)
    }

    async fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.element(element).is_selected().await.map_err(map_cmd_error)
    }

    async fn screenshot(&self) -> DriverResult<Vec<u8>> {
        self.client.screenshot().await.map_err(map_cmd_error)
    }

    async fn element_screenshot(&self, element: &ElementHandle) -> DriverResult<Vec<u8>> {
        self.element(element).screenshot().await.map_err(map_cmd_error)
    }

    async fn quit(&self) -> DriverResult<()> {
        self.client.clone().close().await.map_err(map_cmd_error)
    }
}
