use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::ActionResult;
use crate::dispatch::ActionArgs;
use crate::session::Session;

/// Load `url` and block until the document reports ready.
pub fn navigate(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let url = args.text("url")?;
        session.driver().navigate(url).await?;
        session.wait_for_page_ready().await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn reload(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        session.driver().refresh().await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn go_back(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        session.driver().back().await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn go_forward(session: &Session, _args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        session.driver().forward().await?;
        Ok(Value::Null)
    }
    .boxed()
}
