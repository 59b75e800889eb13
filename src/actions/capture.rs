use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::ActionResult;
use crate::dispatch::ActionArgs;
use crate::error::ActionError;
use crate::session::Session;

/// Viewport PNG, written to `path` when given, base64 otherwise.
pub fn screenshot(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let png = session.driver().screenshot().await?;
        deliver(png, args.opt_text("path")?).await
    }
    .boxed()
}

pub fn element_screenshot(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        let png = session.driver().element_screenshot(&element).await?;
        deliver(png, args.opt_text("path")?).await
    }
    .boxed()
}

async fn deliver(png: Vec<u8>, path: Option<&str>) -> ActionResult {
    match path {
        Some(path) => {
            tokio::fs::write(path, &png)
                .await
                .map_err(|source| ActionError::Write {
                    path: PathBuf::from(path),
                    source,
                })?;
            log::debug!("Wrote {} byte screenshot to {}", png.len(), path);
            Ok(Value::String(path.to_string()))
        }
        None => Ok(Value::String(STANDARD.encode(&png))),
    }
}
