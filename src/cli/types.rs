use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use super::toolset::{load_and_merge_toolsets, qualify};
use crate::actions::DEFAULT_NAMESPACE;
use crate::driver::{BrowserKind, WebDriverConfig};

/// Browser automation tools for AI agents over MCP stdio.
///
/// Drives a browser through an already-running WebDriver server
/// (msedgedriver, chromedriver or geckodriver) and exposes each browser
/// action as a schema-typed MCP tool named `<namespace>.<action>`.
#[derive(Parser, Debug)]
#[command(name = "browser-toolcalls")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable specific tools by name (comma-separated)
    ///
    /// Example: --tools browser.navigate,browser.click,get_text
    ///
    /// Unqualified names are placed under --namespace.
    /// If not specified, all tools are enabled.
    #[arg(long, value_delimiter = ',', conflicts_with = "tool")]
    pub tools: Option<Vec<String>>,

    /// Enable specific tool by name (can be specified multiple times)
    ///
    /// Example: --tool browser.navigate --tool browser.screenshot
    #[arg(long = "tool", conflicts_with = "tools")]
    pub tool: Vec<String>,

    /// Load tool names from JSON file (can be specified multiple times)
    ///
    /// JSON format:
    /// ```json
    /// {
    ///   "tools": [
    ///     "browser.navigate",
    ///     "browser.get_text"
    ///   ]
    /// }
    /// ```
    #[arg(long, value_name = "PATH", conflicts_with_all = ["tool", "tools"])]
    pub toolset: Vec<PathBuf>,

    /// List available tool names and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Print the versioned action catalog as JSON and exit
    #[arg(long, conflicts_with = "list_tools")]
    pub print_catalog: bool,

    /// Namespace prefix for advertised tool names
    #[arg(long, value_name = "NAME", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// WebDriver server endpoint
    #[arg(
        long,
        value_name = "URL",
        env = "WEBDRIVER_URL",
        default_value = "http://localhost:9515"
    )]
    pub webdriver_url: String,

    /// Browser family the WebDriver server drives
    #[arg(long, value_enum, env = "BROWSER_KIND", default_value = "edge")]
    pub browser: BrowserKind,

    /// Run the browser without a visible window
    #[arg(long, env = "BROWSER_HEADLESS")]
    pub headless: bool,

    /// Seconds to wait for `document.readyState == "complete"` after navigation
    #[arg(
        long,
        value_name = "SECONDS",
        env = "BROWSER_PAGE_LOAD_TIMEOUT_SECS",
        default_value = "10"
    )]
    pub page_load_timeout: u64,

    /// WebDriver connection timeout in seconds, per attempt
    #[arg(
        long,
        value_name = "SECONDS",
        env = "WEBDRIVER_CONNECT_TIMEOUT_SECS",
        default_value = "30"
    )]
    pub connect_timeout: u64,

    /// Maximum WebDriver connection attempts
    /// Set to 1 to disable retries (fail fast)
    #[arg(long, value_name = "COUNT", default_value = "3")]
    pub connect_retries: u32,

    /// Initial connection retry backoff in seconds
    /// Backoff doubles on each retry up to 10 seconds maximum
    #[arg(long, value_name = "SECONDS", default_value = "1")]
    pub connect_retry_backoff: u64,

    /// Disable connection retries (fail fast on first failure)
    #[arg(long)]
    pub connect_no_retry: bool,
}

impl Cli {
    /// Get the set of enabled tool names, qualified with the namespace
    ///
    /// Returns None if no filter specified (enable all tools)
    /// Returns Some(HashSet) if filter specified (enable only these tools)
    pub async fn enabled_tools(&self) -> anyhow::Result<Option<HashSet<String>>> {
        let names: Vec<String> = if !self.toolset.is_empty() {
            load_and_merge_toolsets(&self.toolset).await?
        } else if let Some(tools) = &self.tools {
            tools.clone()
        } else if !self.tool.is_empty() {
            self.tool.clone()
        } else {
            return Ok(None);
        };

        Ok(Some(
            names
                .iter()
                .map(|name| qualify(name, &self.namespace))
                .collect(),
        ))
    }

    /// Maximum number of connection attempts, 1 if --connect-no-retry is set
    pub fn connect_max_retries(&self) -> u32 {
        if self.connect_no_retry {
            1
        } else {
            self.connect_retries
        }
    }

    pub fn page_load_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout)
    }

    pub fn webdriver_config(&self) -> WebDriverConfig {
        WebDriverConfig {
            url: self.webdriver_url.clone(),
            browser: self.browser,
            headless: self.headless,
            connection_timeout: Duration::from_secs(self.connect_timeout),
            max_retries: self.connect_max_retries(),
            retry_backoff: Duration::from_secs(self.connect_retry_backoff),
        }
    }
}
