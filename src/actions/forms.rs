use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::ActionResult;
use crate::dispatch::ActionArgs;
use crate::error::ActionError;
use crate::resolver::Selector;
use crate::resolver::synth::css_string;
use crate::session::Session;

/// Click every enabled, not yet selected `<option>` whose value is `value`.
pub fn select_option(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let select = session.find(args.text("selector")?).await?;
        let value = args.text("value")?;
        let driver = session.driver();

        let options = driver
            .find_within(&select, &Selector::css(format!("option[value={}]", css_string(value))))
            .await?;

        for option in &options {
            if driver.is_selected(option).await? || !driver.is_enabled(option).await? {
                continue;
            }
            driver.click(option).await?;
        }
        Ok(Value::Null)
    }
    .boxed()
}

pub fn check(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        set_selected(session, args.text("selector")?, true).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn uncheck(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        set_selected(session, args.text("selector")?, false).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn toggle(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let element = session.find(args.text("selector")?).await?;
        session.driver().click(&element).await?;
        Ok(Value::Null)
    }
    .boxed()
}

pub fn set_checkbox(session: &Session, args: ActionArgs) -> BoxFuture<'_, ActionResult> {
    async move {
        let state = args.boolean("state")?;
        set_selected(session, args.text("selector")?, state).await?;
        Ok(Value::Null)
    }
    .boxed()
}

// Clicks only when the current state differs.
async fn set_selected(session: &Session, selector: &str, state: bool) -> Result<(), ActionError> {
    let element = session.find(selector).await?;
    let driver = session.driver();
    if driver.is_selected(&element).await? != state {
        driver.click(&element).await?;
    }
    Ok(())
}
