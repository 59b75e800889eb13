use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::{ActionResult, duration_arg};
use crate::dispatch::ActionArgs;
use crate::error::ActionError;
use crate::resolver::text::TextMatcher;
use crate::resolver::{Selector, TextMatch, WaitSpec, wait_until};
use crate::session::Session;

/// Poll until `selector` matches an element.
pub fn wait_for(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let selector = Selector::css(args.text("selector")?);
        let spec = WaitSpec::new(duration_arg(&args, "timeout")?);
        let driver = session.driver();
        let target = &selector;

        wait_until(spec, &selector.value, move || async move {
            driver.find_element(target).await.map(|_| true)
        })
        .await?;
        Ok(Value::Null)
    }
    .boxed()
}

/// Poll until the element's text satisfies `text` under `match_mode`.
pub fn wait_until_text(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let selector = Selector::css(args.text("selector")?);
        let text = args.text("text")?;
        let spec = WaitSpec::new(duration_arg(&args, "timeout")?);
        let mode = match args.opt_enumeration("match_mode")? {
            Some(name) => TextMatch::from_name(name).ok_or_else(|| {
                ActionError::argument("match_mode", format!("unknown match mode `{name}`"))
            })?,
            None => TextMatch::default(),
        };
        let matcher = TextMatcher::new(text, mode)
            .map_err(|e| ActionError::argument("text", format!("invalid pattern: {e}")))?;

        let driver = session.driver();
        let target = &selector;
        let matcher = &matcher;
        let what = format!("text {text:?} in `{}`", selector.value);

        wait_until(spec, &what, move || async move {
            let element = driver.find_element(target).await?;
            let current = driver.text(&element).await?;
            Ok(matcher.matches(&current))
        })
        .await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn sleep(_session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        tokio::time::sleep(duration_arg(&args, "seconds")?).await;
        Ok(Value::Null)
    }
    .boxed()
}
