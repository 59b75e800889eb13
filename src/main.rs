use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use browser_toolcalls::actions::BROWSER_ACTIONS;
use browser_toolcalls::catalog::build_catalog;
use browser_toolcalls::cli::Cli;
use browser_toolcalls::dispatch::Dispatcher;
use browser_toolcalls::driver::WebDriverSession;
use browser_toolcalls::session::{Session, SessionContext};
use browser_toolcalls::stdio::{BrowserMcpServer, build_tools};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let catalog = Arc::new(build_catalog(BROWSER_ACTIONS, &cli.namespace));

    // Handle list-tools flag
    if cli.list_tools {
        println!("Available tools:");
        for tool in catalog.names() {
            println!("  - {tool}");
        }
        return Ok(());
    }

    // Handle print-catalog flag
    if cli.print_catalog {
        let document = serde_json::json!({
            "catalog": catalog.to_json(),
            "tools": build_tools(&catalog, None),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&document).context("Failed to serialize catalog")?
        );
        return Ok(());
    }

    // Get enabled tools from CLI (--tool/--tools/--toolset)
    let enabled_tools = cli.enabled_tools().await?;

    // VALIDATE IMMEDIATELY - before connecting to the browser
    if let Some(ref tools) = enabled_tools {
        let mut invalid: Vec<_> = tools
            .iter()
            .filter(|tool| catalog.get(tool).is_none())
            .collect();
        invalid.sort();

        if !invalid.is_empty() {
            eprintln!("Error: Invalid tool names specified:");
            for tool in &invalid {
                eprintln!("  - {tool}");
            }
            eprintln!();
            eprintln!("Available tools:");
            for tool in catalog.names() {
                eprintln!("  - {tool}");
            }
            eprintln!();
            eprintln!("Tip: Use --list-tools to see all available tools");
            return Err(anyhow::anyhow!("Invalid tool names specified"));
        }
    }

    // Create cancellation token for graceful shutdown during initialization
    let shutdown_token = tokio_util::sync::CancellationToken::new();

    // Spawn cross-platform signal handler
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        wait_for_interrupt().await;
        log::debug!("Received interrupt signal");
        signal_token.cancel();
    });

    let webdriver_config = cli.webdriver_config();
    let driver = match WebDriverSession::connect(&webdriver_config, &shutdown_token).await {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Failed to open a browser session at {}: {e:#}", webdriver_config.url);
            log::error!("Check that a WebDriver server (e.g. msedgedriver --port=9515) is running");
            return Err(e);
        }
    };

    let session = Session::new(Arc::new(driver))
        .with_page_load_timeout(cli.page_load_timeout_duration());
    let dispatcher = Arc::new(Dispatcher::new(catalog, SessionContext::new(session)));
    let server = BrowserMcpServer::new(Arc::clone(&dispatcher), enabled_tools);

    // Serve until stdin closes or an interrupt arrives
    let served = tokio::select! {
        res = server.serve_stdio() => res,
        () = shutdown_token.cancelled() => {
            log::info!("Shutting down on interrupt");
            Ok(())
        }
    };

    if let Err(e) = dispatcher.shutdown().await {
        log::warn!("Failed to close browser session: {e}");
    }

    served
}

/// Wait for interrupt signal (cross-platform)
#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm_result = signal(SignalKind::terminate());
    let mut sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result.as_mut(), sigint_result.as_mut()) {
        (Ok(sigterm), Ok(sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = sigint.recv() => {}
            }
        }
        (Ok(sigterm), Err(_)) => {
            let _ = sigterm.recv().await;
        }
        (Err(_), Ok(sigint)) => {
            let _ = sigint.recv().await;
        }
        (Err(_), Err(_)) => {
            let () = std::future::pending().await;
        }
    }
}

/// Wait for interrupt signal (cross-platform)
#[cfg(windows)]
async fn wait_for_interrupt() {
    use tokio::signal::windows;

    match windows::ctrl_c() {
        Ok(mut ctrl_c) => {
            let _ = ctrl_c.recv().await;
        }
        Err(_) => {
            let () = std::future::pending().await;
        }
    }
}
